use contracts::domain::chat::{ChatMessageRecord, ChatMessageRole, ChatSession};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

pub mod session_entity {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a004_chat_session")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub user_id: String,
        pub session_id: String,
        pub created_at: Option<String>,
        pub updated_at: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod message_entity {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a004_chat_message")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        /// References a004_chat_session.id
        pub session_ref: String,
        pub role: String,
        pub content: String,
        pub timestamp: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

impl From<message_entity::Model> for ChatMessageRecord {
    fn from(m: message_entity::Model) -> Self {
        ChatMessageRecord {
            role: match m.role.as_str() {
                "assistant" => ChatMessageRole::Assistant,
                _ => ChatMessageRole::User,
            },
            content: m.content,
            timestamp: m.timestamp,
        }
    }
}

async fn find_session(
    user_id: &str,
    session_id: &str,
) -> anyhow::Result<Option<session_entity::Model>> {
    let session = session_entity::Entity::find()
        .filter(session_entity::Column::UserId.eq(user_id))
        .filter(session_entity::Column::SessionId.eq(session_id))
        .one(conn())
        .await?;
    Ok(session)
}

/// Sessions of a user, most recently active first
pub async fn list_sessions(user_id: &str) -> anyhow::Result<Vec<ChatSession>> {
    let rows = session_entity::Entity::find()
        .filter(session_entity::Column::UserId.eq(user_id))
        .order_by_desc(session_entity::Column::UpdatedAt)
        .all(conn())
        .await?;

    Ok(rows
        .into_iter()
        .map(|s| ChatSession {
            session_id: s.session_id,
            created_at: s.created_at.unwrap_or_default(),
            updated_at: s.updated_at.unwrap_or_default(),
        })
        .collect())
}

/// Message history of one session, oldest first. None when the session
/// does not exist for this user.
pub async fn get_history(
    user_id: &str,
    session_id: &str,
) -> anyhow::Result<Option<Vec<ChatMessageRecord>>> {
    let Some(session) = find_session(user_id, session_id).await? else {
        return Ok(None);
    };

    let messages = message_entity::Entity::find()
        .filter(message_entity::Column::SessionRef.eq(session.id))
        .order_by_asc(message_entity::Column::Timestamp)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Some(messages))
}

/// Append a user/assistant exchange, creating the session row when needed.
/// Both messages and the session bump land in one transaction.
pub async fn append_exchange(
    user_id: &str,
    session_id: &str,
    prompt: &str,
    reply: &str,
) -> anyhow::Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    let txn = conn().begin().await?;

    let session = session_entity::Entity::find()
        .filter(session_entity::Column::UserId.eq(user_id))
        .filter(session_entity::Column::SessionId.eq(session_id))
        .one(&txn)
        .await?;

    let session_ref = match session {
        Some(s) => {
            session_entity::ActiveModel {
                id: Set(s.id.clone()),
                updated_at: Set(Some(now.clone())),
                ..Default::default()
            }
            .update(&txn)
            .await?;
            s.id
        }
        None => {
            let id = Uuid::new_v4().to_string();
            session_entity::ActiveModel {
                id: Set(id.clone()),
                user_id: Set(user_id.to_string()),
                session_id: Set(session_id.to_string()),
                created_at: Set(Some(now.clone())),
                updated_at: Set(Some(now.clone())),
            }
            .insert(&txn)
            .await?;
            id
        }
    };

    message_entity::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        session_ref: Set(session_ref.clone()),
        role: Set(ChatMessageRole::User.as_str().to_string()),
        content: Set(prompt.to_string()),
        timestamp: Set(now.clone()),
    }
    .insert(&txn)
    .await?;

    message_entity::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        session_ref: Set(session_ref),
        role: Set(ChatMessageRole::Assistant.as_str().to_string()),
        content: Set(reply.to_string()),
        timestamp: Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(())
}

/// Delete a session and its messages. Returns false when it did not exist.
pub async fn delete_session(user_id: &str, session_id: &str) -> anyhow::Result<bool> {
    let Some(session) = find_session(user_id, session_id).await? else {
        return Ok(false);
    };

    let txn = conn().begin().await?;
    message_entity::Entity::delete_many()
        .filter(message_entity::Column::SessionRef.eq(session.id.clone()))
        .exec(&txn)
        .await?;
    session_entity::Entity::delete_by_id(session.id).exec(&txn).await?;
    txn.commit().await?;
    Ok(true)
}
