use contracts::domain::chat::{
    AnalysisKind, ChatMessageRecord, ChatRequest, ChatResponse, ChatSession,
};
use uuid::Uuid;

use super::{context, repository};
use crate::shared::config;
use crate::shared::llm::{ChatMessage, LlmProvider, OpenAiProvider};

const SYSTEM_PROMPT: &str = "You are an AI assistant for an ERP system covering inventory, \
finance and project management. Answer using the business data snapshot provided with each \
request. Amounts are Indonesian Rupiah. Be concise and concrete; when the data does not \
cover a question, say so instead of guessing.";

fn provider() -> anyhow::Result<OpenAiProvider> {
    let cfg = config::load_config()?;
    OpenAiProvider::from_config(&cfg.llm).map_err(|e| anyhow::anyhow!(e))
}

async fn complete(prompt_messages: Vec<ChatMessage>) -> anyhow::Result<String> {
    let provider = provider()?;
    let response = provider
        .chat_completion(prompt_messages)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(response.content)
}

/// Answer a prompt against the current business data. History is persisted
/// only after the model call succeeds.
pub async fn chat(user_id: &str, request: ChatRequest) -> anyhow::Result<ChatResponse> {
    if request.prompt.trim().is_empty() {
        anyhow::bail!("Prompt is required");
    }

    let session_id = request
        .session_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let snapshot = context::fetch_snapshot().await?;
    let digest = context::build_digest(&snapshot);

    let mut messages = vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::system(digest),
    ];
    if let Some(history) = repository::get_history(user_id, &session_id).await? {
        for record in history {
            messages.push(match record.role {
                contracts::domain::chat::ChatMessageRole::User => {
                    ChatMessage::user(record.content)
                }
                contracts::domain::chat::ChatMessageRole::Assistant => {
                    ChatMessage::assistant(record.content)
                }
            });
        }
    }
    messages.push(ChatMessage::user(request.prompt.clone()));

    let reply = complete(messages).await?;

    repository::append_exchange(user_id, &session_id, &request.prompt, &reply).await?;

    Ok(ChatResponse { reply, session_id })
}

/// One-shot analysis of a single business area. Nothing is persisted.
pub async fn analyze(kind: AnalysisKind) -> anyhow::Result<String> {
    let snapshot = context::fetch_snapshot().await?;
    let digest = context::build_digest(&snapshot);

    let instruction = match kind {
        AnalysisKind::Inventory => {
            "Analyze the inventory data: stock health, low stock risks and restocking priorities."
        }
        AnalysisKind::Finance => {
            "Analyze the financial data: income versus expenses, margins and category trends."
        }
        AnalysisKind::Projects => {
            "Analyze the project data: progress, workload and delivery risks."
        }
    };

    let messages = vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::system(digest),
        ChatMessage::user(instruction),
    ];

    complete(messages).await
}

pub async fn list_sessions(user_id: &str) -> anyhow::Result<Vec<ChatSession>> {
    repository::list_sessions(user_id).await
}

pub async fn get_history(
    user_id: &str,
    session_id: &str,
) -> anyhow::Result<Option<Vec<ChatMessageRecord>>> {
    repository::get_history(user_id, session_id).await
}

pub async fn delete_session(user_id: &str, session_id: &str) -> anyhow::Result<bool> {
    repository::delete_session(user_id, session_id).await
}
