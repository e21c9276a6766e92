//! Common Test Utilities
//!
//! Shared helpers for driving the real-time subsystem without a server.

use chrono::Utc;
use tokio::sync::mpsc;
use uuid::Uuid;

use parley::domain::{MessageKind, Profile};
use parley::presentation::realtime::{ConnectionId, Hub, MessagePayload, ServerEvent};

/// A registered connection with its outbound event queue.
pub struct TestClient {
    pub id: ConnectionId,
    pub rx: mpsc::UnboundedReceiver<ServerEvent>,
}

impl TestClient {
    /// Collect every event currently queued for this client.
    pub fn drain(&mut self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Register a connection for `user_id` on the hub.
pub fn connect(hub: &Hub, user_id: i64) -> TestClient {
    let (tx, rx) = mpsc::unbounded_channel();
    let id = hub.connect(user_id, tx);
    TestClient { id, rx }
}

/// Build a direct-message payload from `sender_id` to `target_id`.
pub fn direct_payload(sender_id: i64, target_id: i64, content: &str) -> MessagePayload {
    MessagePayload {
        id: Uuid::now_v7(),
        kind: MessageKind::Direct,
        sender: profile(sender_id),
        target_id: Some(target_id),
        channel_id: None,
        content: content.to_string(),
        attachments: Vec::new(),
        created_at: Utc::now(),
    }
}

/// Build a group-message payload.
pub fn group_payload(sender_id: i64, group_id: i64, content: &str) -> MessagePayload {
    MessagePayload {
        id: Uuid::now_v7(),
        kind: MessageKind::Group,
        sender: profile(sender_id),
        target_id: Some(group_id),
        channel_id: None,
        content: content.to_string(),
        attachments: Vec::new(),
        created_at: Utc::now(),
    }
}

/// Build a channel-message payload.
pub fn channel_payload(sender_id: i64, channel_id: i64, content: &str) -> MessagePayload {
    MessagePayload {
        id: Uuid::now_v7(),
        kind: MessageKind::Channel,
        sender: profile(sender_id),
        target_id: None,
        channel_id: Some(channel_id),
        content: content.to_string(),
        attachments: Vec::new(),
        created_at: Utc::now(),
    }
}

fn profile(user_id: i64) -> Profile {
    Profile {
        id: user_id,
        username: format!("user{}", user_id),
        avatar_url: None,
    }
}
