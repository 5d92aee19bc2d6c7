use axum::extract::{Json, Path, Query};
use contracts::domain::chat::{
    AnalysisKind, AnalysisResponse, ChatMessageRecord, ChatRequest, ChatResponse, ChatSession,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::a004_chat::service;
use crate::shared::error::ApiError;
use crate::system::auth::extractor::CurrentUser;

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    #[serde(rename = "type")]
    pub kind: AnalysisKind,
}

/// POST /api/chat
pub async fn chat(
    CurrentUser(claims): CurrentUser,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if request.prompt.trim().is_empty() {
        return Err(ApiError::validation("Prompt is required"));
    }

    let response = service::chat(&claims.sub, request)
        .await
        .map_err(|e| ApiError::internal("AI service unavailable", e))?;
    Ok(Json(response))
}

/// GET /api/chat/analyze?type=inventory|finance|projects
pub async fn analyze(
    Query(query): Query<AnalyzeQuery>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let analysis = service::analyze(query.kind)
        .await
        .map_err(|e| ApiError::internal("AI service unavailable", e))?;
    Ok(Json(AnalysisResponse { analysis }))
}

/// GET /api/chat/sessions
pub async fn list_sessions(
    CurrentUser(claims): CurrentUser,
) -> Result<Json<Vec<ChatSession>>, ApiError> {
    let sessions = service::list_sessions(&claims.sub)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch chat sessions", e))?;
    Ok(Json(sessions))
}

/// GET /api/chat/history/:session_id
pub async fn get_history(
    CurrentUser(claims): CurrentUser,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<ChatMessageRecord>>, ApiError> {
    let history = service::get_history(&claims.sub, &session_id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch chat history", e))?
        .ok_or_else(|| ApiError::not_found("Chat session not found"))?;
    Ok(Json(history))
}

/// DELETE /api/chat/sessions/:session_id
pub async fn delete_session(
    CurrentUser(claims): CurrentUser,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let deleted = service::delete_session(&claims.sub, &session_id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete chat session", e))?;

    if !deleted {
        return Err(ApiError::not_found("Chat session not found"));
    }

    Ok(Json(json!({ "message": "Chat session deleted" })))
}
