//! Message entity and repository trait.
//!
//! Maps to the `messages` table. Messages are immutable once created; the
//! `kind` decides how delivery is addressed after persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

/// Message kinds matching the `messages.kind` CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// One-to-one message between accepted friends; `target_id` is the
    /// recipient's user id.
    #[default]
    Direct,
    /// Message to a group's main room; `target_id` is the group id.
    Group,
    /// Message to a channel; `channel_id` is set.
    Channel,
}

impl MessageKind {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "direct" => Some(Self::Direct),
            "group" => Some(Self::Group),
            "channel" => Some(Self::Channel),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Group => "group",
            Self::Channel => "channel",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An attachment descriptor, produced by the upload endpoint and carried
/// verbatim inside the message's `attachments` JSONB column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Public URL the file is served from
    pub url: String,
    /// Original file name as uploaded
    pub original: String,
    /// MIME type reported at upload time
    pub mimetype: String,
    /// Size in bytes
    pub size: i64,
}

/// A persisted message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Globally unique ID, generated at send time
    pub id: Uuid,

    #[serde(rename = "type")]
    pub kind: MessageKind,

    pub sender_id: i64,

    /// Recipient user id for direct messages, group id for group messages
    pub target_id: Option<i64>,

    /// Channel id for channel messages
    pub channel_id: Option<i64>,

    pub content: String,

    pub attachments: Vec<Attachment>,

    pub created_at: DateTime<Utc>,
}

/// A message joined with its sender's public profile, as returned by history
/// queries.
#[derive(Debug, Clone)]
pub struct MessageWithSender {
    pub message: Message,
    pub sender_username: String,
    pub sender_avatar_url: Option<String>,
}

/// History query addressing; mirrors the fan-out addressing families.
#[derive(Debug, Clone, Copy)]
pub enum HistoryScope {
    /// Direct conversation between two users, either direction.
    Direct { user_id: i64, other_id: i64 },
    Group { group_id: i64 },
    Channel { channel_id: i64 },
}

/// Repository trait for Message data access operations.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a new message.
    async fn create(&self, message: &Message) -> Result<(), AppError>;

    /// Fetch the newest `limit` messages in a scope, returned oldest-first,
    /// with sender profiles joined.
    async fn history(
        &self,
        scope: HistoryScope,
        limit: i64,
    ) -> Result<Vec<MessageWithSender>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!(MessageKind::from_str("direct"), Some(MessageKind::Direct));
        assert_eq!(MessageKind::from_str("GROUP"), Some(MessageKind::Group));
        assert_eq!(MessageKind::from_str("channel"), Some(MessageKind::Channel));
        assert_eq!(MessageKind::from_str("broadcast"), None);
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            MessageKind::Direct,
            MessageKind::Group,
            MessageKind::Channel,
        ] {
            assert_eq!(MessageKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MessageKind::Direct).unwrap(),
            "\"direct\""
        );
    }

    #[test]
    fn test_attachment_wire_shape() {
        let attachment = Attachment {
            url: "/uploads/abc__cat.png".into(),
            original: "cat.png".into(),
            mimetype: "image/png".into(),
            size: 1024,
        };

        let json = serde_json::to_value(&attachment).unwrap();
        assert_eq!(json["url"], "/uploads/abc__cat.png");
        assert_eq!(json["original"], "cat.png");
        assert_eq!(json["mimetype"], "image/png");
        assert_eq!(json["size"], 1024);
    }
}
