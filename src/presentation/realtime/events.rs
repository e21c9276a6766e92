//! Real-time wire protocol.
//!
//! Frames are JSON objects `{"event": ..., "data": ...}` in both directions.
//! Voice signaling payloads are opaque `serde_json::Value`s: the relay never
//! inspects session descriptions or candidate data, so it stays decoupled
//! from whatever media-negotiation protocol version clients speak.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Attachment, MessageKind, MessageWithSender, Profile};

/// Unique handle for one live connection. A user with several devices holds
/// several connection ids.
pub type ConnectionId = Uuid;

/// Events received from clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "room:join")]
    RoomJoin { room: String },

    #[serde(rename = "room:leave")]
    RoomLeave { room: String },

    #[serde(rename = "typing")]
    Typing { room: String },

    #[serde(rename = "voice:join")]
    VoiceJoin { room: String },

    #[serde(rename = "voice:leave")]
    VoiceLeave { room: String },

    #[serde(rename = "voice:signal")]
    VoiceSignal {
        room: String,
        data: serde_json::Value,
        /// Direct target connection; when absent the signal goes to every
        /// other participant of the voice room.
        #[serde(default)]
        to: Option<ConnectionId>,
    },
}

/// Events pushed to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "msg:new")]
    MessageNew(MessagePayload),

    #[serde(rename = "typing")]
    Typing {
        #[serde(rename = "userId")]
        user_id: i64,
        room: String,
    },

    #[serde(rename = "voice:peer-joined")]
    VoicePeerJoined {
        #[serde(rename = "userId")]
        user_id: i64,
    },

    #[serde(rename = "voice:peer-left")]
    VoicePeerLeft {
        #[serde(rename = "userId")]
        user_id: i64,
    },

    #[serde(rename = "voice:signal")]
    VoiceSignal {
        /// Connection id of the signaling peer; a direct reply addresses it
        /// via the `to` field of a client `voice:signal`.
        from: ConnectionId,
        data: serde_json::Value,
    },
}

/// Fully hydrated message as delivered over `msg:new`: sender profile
/// resolved, attachments materialized.
#[derive(Debug, Clone, Serialize)]
pub struct MessagePayload {
    pub id: Uuid,

    #[serde(rename = "type")]
    pub kind: MessageKind,

    pub sender: Profile,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<i64>,

    pub content: String,

    pub attachments: Vec<Attachment>,

    pub created_at: DateTime<Utc>,
}

impl From<MessageWithSender> for MessagePayload {
    fn from(row: MessageWithSender) -> Self {
        Self {
            id: row.message.id,
            kind: row.message.kind,
            sender: Profile {
                id: row.message.sender_id,
                username: row.sender_username,
                avatar_url: row.sender_avatar_url,
            },
            target_id: row.message.target_id,
            channel_id: row.message.channel_id,
            content: row.message.content,
            attachments: row.message.attachments,
            created_at: row.message.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_client_event_room_join_parses() {
        let frame = r#"{"event":"room:join","data":{"room":"group:3"}}"#;
        let event: ClientEvent = serde_json::from_str(frame).unwrap();

        match event {
            ClientEvent::RoomJoin { room } => assert_eq!(room, "group:3"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_client_event_voice_signal_without_target() {
        let frame = r#"{"event":"voice:signal","data":{"room":"lobby","data":{"sdp":"offer"}}}"#;
        let event: ClientEvent = serde_json::from_str(frame).unwrap();

        match event {
            ClientEvent::VoiceSignal { room, data, to } => {
                assert_eq!(room, "lobby");
                assert_eq!(data["sdp"], "offer");
                assert!(to.is_none());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_client_event_voice_signal_with_target() {
        let target = Uuid::new_v4();
        let frame = format!(
            r#"{{"event":"voice:signal","data":{{"room":"lobby","data":{{}},"to":"{}"}}}}"#,
            target
        );
        let event: ClientEvent = serde_json::from_str(&frame).unwrap();

        match event {
            ClientEvent::VoiceSignal { to, .. } => assert_eq!(to, Some(target)),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_client_event_rejects_unknown_event() {
        let frame = r#"{"event":"admin:shutdown","data":{}}"#;
        assert!(serde_json::from_str::<ClientEvent>(frame).is_err());
    }

    #[test]
    fn test_server_event_typing_wire_shape() {
        let event = ServerEvent::Typing {
            user_id: 7,
            room: "channel:2".into(),
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "typing");
        assert_eq!(json["data"]["userId"], 7);
        assert_eq!(json["data"]["room"], "channel:2");
    }

    #[test]
    fn test_server_event_peer_joined_wire_shape() {
        let event = ServerEvent::VoicePeerJoined { user_id: 3 };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "voice:peer-joined");
        assert_eq!(json["data"]["userId"], 3);
    }

    #[test]
    fn test_message_payload_wire_shape() {
        let payload = MessagePayload {
            id: Uuid::new_v4(),
            kind: MessageKind::Direct,
            sender: Profile {
                id: 1,
                username: "alice".into(),
                avatar_url: None,
            },
            target_id: Some(2),
            channel_id: None,
            content: "hi".into(),
            attachments: vec![],
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(ServerEvent::MessageNew(payload)).unwrap();

        assert_eq!(json["event"], "msg:new");
        assert_eq!(json["data"]["type"], "direct");
        assert_eq!(json["data"]["sender"]["id"], 1);
        assert_eq!(json["data"]["content"], "hi");
        // channel_id is omitted when absent
        assert!(json["data"].get("channel_id").is_none());
    }
}
