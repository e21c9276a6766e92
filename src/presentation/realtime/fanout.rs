//! Message fan-out engine.
//!
//! Pure addressing plus broadcast: given a persisted, hydrated message, pick
//! the target room(s) and publish one `msg:new` per room. Authorization
//! happened at the HTTP layer before persistence; delivery here is
//! best-effort and only runs once persistence has succeeded.

use super::events::{MessagePayload, ServerEvent};
use super::hub::Hub;
use crate::domain::{MessageKind, RoomKey};
use crate::infrastructure::metrics;

/// Target rooms for a message, by kind:
///
/// | kind    | room(s)                                     |
/// |---------|---------------------------------------------|
/// | direct  | `user:<target>` and `user:<sender>` (echo)  |
/// | group   | `group:<target>`                            |
/// | channel | `channel:<channel_id>`                      |
///
/// The sender-side echo keeps every device of the sender consistent.
pub fn target_rooms(payload: &MessagePayload) -> Vec<RoomKey> {
    match payload.kind {
        MessageKind::Direct => {
            let mut rooms = Vec::with_capacity(2);
            if let Some(target_id) = payload.target_id {
                rooms.push(RoomKey::User(target_id));
            }
            rooms.push(RoomKey::User(payload.sender.id));
            rooms
        }
        MessageKind::Group => payload.target_id.map(RoomKey::Group).into_iter().collect(),
        MessageKind::Channel => payload
            .channel_id
            .map(RoomKey::Channel)
            .into_iter()
            .collect(),
    }
}

/// Publish a persisted message to all matching live connections.
pub fn deliver(hub: &Hub, payload: MessagePayload) {
    let rooms = target_rooms(&payload);
    tracing::debug!(
        message_id = %payload.id,
        kind = %payload.kind,
        rooms = rooms.len(),
        "Delivering message"
    );

    let event = ServerEvent::MessageNew(payload);
    for room in &rooms {
        hub.broadcast(room, &event);
    }
    metrics::MESSAGES_DELIVERED_TOTAL.inc();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    use crate::domain::Profile;

    fn payload(kind: MessageKind, sender_id: i64) -> MessagePayload {
        MessagePayload {
            id: Uuid::now_v7(),
            kind,
            sender: Profile {
                id: sender_id,
                username: "alice".into(),
                avatar_url: None,
            },
            target_id: None,
            channel_id: None,
            content: "hi".into(),
            attachments: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_direct_targets_both_personal_rooms() {
        let mut message = payload(MessageKind::Direct, 1);
        message.target_id = Some(2);

        assert_eq!(
            target_rooms(&message),
            vec![RoomKey::User(2), RoomKey::User(1)]
        );
    }

    #[test]
    fn test_group_targets_group_room_only() {
        let mut message = payload(MessageKind::Group, 1);
        message.target_id = Some(9);

        assert_eq!(target_rooms(&message), vec![RoomKey::Group(9)]);
    }

    #[test]
    fn test_channel_targets_channel_room_only() {
        let mut message = payload(MessageKind::Channel, 1);
        message.channel_id = Some(4);

        assert_eq!(target_rooms(&message), vec![RoomKey::Channel(4)]);
    }

    #[tokio::test]
    async fn test_direct_delivery_reaches_sender_and_recipient_rooms_only() {
        let hub = Hub::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let (tx_c, mut rx_c) = mpsc::unbounded_channel();
        hub.connect(1, tx_a);
        hub.connect(2, tx_b);
        hub.connect(3, tx_c);

        let mut message = payload(MessageKind::Direct, 1);
        message.target_id = Some(2);
        deliver(&hub, message);

        assert!(rx_a.try_recv().is_ok(), "sender echo missing");
        assert!(rx_b.try_recv().is_ok(), "recipient delivery missing");
        assert!(rx_c.try_recv().is_err(), "third party must not receive");
    }

    #[tokio::test]
    async fn test_direct_scenario_payload_content() {
        // A(id=1) sends {type:direct, target_id:2, text:"hi"}: every
        // connection in user:1 or user:2 sees msg:new with sender.id == 1.
        let hub = Hub::new();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        hub.connect(2, tx_b);

        let mut message = payload(MessageKind::Direct, 1);
        message.target_id = Some(2);
        deliver(&hub, message);

        match rx_b.try_recv().unwrap() {
            ServerEvent::MessageNew(received) => {
                assert_eq!(received.content, "hi");
                assert_eq!(received.sender.id, 1);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_group_delivery_scoped_to_live_joins() {
        // Delivery reaches connections joined to the group room, regardless
        // of storage-level membership rows.
        let hub = Hub::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let a = hub.connect(1, tx_a);
        hub.connect(2, tx_b);
        hub.join(a, RoomKey::Group(9));

        let mut message = payload(MessageKind::Group, 2);
        message.target_id = Some(9);
        deliver(&hub, message);

        assert!(rx_a.try_recv().is_ok());
        // User 2 is the sender but never joined the group room.
        assert!(rx_b.try_recv().is_err());
    }
}
