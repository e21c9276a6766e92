//! Message Repository Implementation
//!
//! PostgreSQL implementation of the MessageRepository trait. Attachments live
//! in a JSONB column and deserialize straight into the domain type.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{
    Attachment, HistoryScope, Message, MessageKind, MessageRepository, MessageWithSender,
};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    kind: String,
    sender_id: i64,
    target_id: Option<i64>,
    channel_id: Option<i64>,
    content: String,
    attachments: Json<Vec<Attachment>>,
    created_at: DateTime<Utc>,
    sender_username: String,
    sender_avatar_url: Option<String>,
}

impl MessageRow {
    fn into_message_with_sender(self) -> MessageWithSender {
        MessageWithSender {
            message: Message {
                id: self.id,
                kind: MessageKind::from_str(&self.kind).unwrap_or_default(),
                sender_id: self.sender_id,
                target_id: self.target_id,
                channel_id: self.channel_id,
                content: self.content,
                attachments: self.attachments.0,
                created_at: self.created_at,
            },
            sender_username: self.sender_username,
            sender_avatar_url: self.sender_avatar_url,
        }
    }
}

/// PostgreSQL message repository implementation.
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const HISTORY_SELECT: &str = r#"
    SELECT m.id, m.kind, m.sender_id, m.target_id, m.channel_id,
           m.content, m.attachments, m.created_at,
           u.username AS sender_username, u.avatar_url AS sender_avatar_url
    FROM messages m
    JOIN users u ON u.id = m.sender_id
"#;

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn create(&self, message: &Message) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, kind, sender_id, target_id, channel_id,
                                  content, attachments, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(message.id)
        .bind(message.kind.as_str())
        .bind(message.sender_id)
        .bind(message.target_id)
        .bind(message.channel_id)
        .bind(&message.content)
        .bind(Json(&message.attachments))
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn history(
        &self,
        scope: HistoryScope,
        limit: i64,
    ) -> Result<Vec<MessageWithSender>, AppError> {
        let rows = match scope {
            HistoryScope::Direct { user_id, other_id } => {
                sqlx::query_as::<_, MessageRow>(&format!(
                    r#"{HISTORY_SELECT}
                    WHERE m.kind = 'direct'
                      AND ((m.sender_id = $1 AND m.target_id = $2)
                        OR (m.sender_id = $2 AND m.target_id = $1))
                    ORDER BY m.created_at DESC
                    LIMIT $3
                    "#
                ))
                .bind(user_id)
                .bind(other_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            HistoryScope::Group { group_id } => {
                sqlx::query_as::<_, MessageRow>(&format!(
                    r#"{HISTORY_SELECT}
                    WHERE m.kind = 'group' AND m.target_id = $1
                    ORDER BY m.created_at DESC
                    LIMIT $2
                    "#
                ))
                .bind(group_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            HistoryScope::Channel { channel_id } => {
                sqlx::query_as::<_, MessageRow>(&format!(
                    r#"{HISTORY_SELECT}
                    WHERE m.kind = 'channel' AND m.channel_id = $1
                    ORDER BY m.created_at DESC
                    LIMIT $2
                    "#
                ))
                .bind(channel_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        // Newest N, presented oldest-first.
        let mut messages: Vec<MessageWithSender> = rows
            .into_iter()
            .map(|r| r.into_message_with_sender())
            .collect();
        messages.reverse();
        Ok(messages)
    }
}
