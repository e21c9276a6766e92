//! Voice-call signaling relay.
//!
//! Brokers peer-to-peer call setup inside a voice room without ever touching
//! media: once peers have exchanged their opaque signaling payloads, packets
//! flow directly between them. A voice session is nothing more than the
//! member set of a `voice:<name>` room; it disappears with its last
//! participant.

use super::events::{ConnectionId, ServerEvent};
use super::hub::Hub;
use crate::domain::RoomKey;
use crate::infrastructure::metrics;

/// Join a voice room and announce the newcomer to the existing participants.
/// Joining an empty room announces nothing.
pub fn join(hub: &Hub, connection_id: ConnectionId, room_name: &str) {
    let Some(user_id) = hub.user_id_of(connection_id) else {
        return;
    };
    let room = RoomKey::Voice(room_name.to_string());

    hub.join(connection_id, room.clone());
    hub.broadcast_excluding(&room, &ServerEvent::VoicePeerJoined { user_id }, connection_id);

    tracing::debug!(user_id, connection_id = %connection_id, room = %room, "Voice join");
}

/// Leave a voice room and notify the remaining participants.
pub fn leave(hub: &Hub, connection_id: ConnectionId, room_name: &str) {
    let Some(user_id) = hub.user_id_of(connection_id) else {
        return;
    };
    let room = RoomKey::Voice(room_name.to_string());

    hub.leave(connection_id, &room);
    hub.broadcast(&room, &ServerEvent::VoicePeerLeft { user_id });

    tracing::debug!(user_id, connection_id = %connection_id, room = %room, "Voice leave");
}

/// Relay an opaque signaling payload. With a direct target, deliver only to
/// that connection; a target without a live connection drops the signal
/// silently (peers handle negotiation timeouts themselves). Without a target,
/// relay to every other participant of the room.
pub fn signal(
    hub: &Hub,
    connection_id: ConnectionId,
    room_name: &str,
    data: serde_json::Value,
    to: Option<ConnectionId>,
) {
    let event = ServerEvent::VoiceSignal {
        from: connection_id,
        data,
    };

    match to {
        Some(target) => {
            if !hub.send_to(target, event) {
                tracing::debug!(
                    target = %target,
                    "Dropping signal for departed connection"
                );
            }
        }
        None => {
            let room = RoomKey::Voice(room_name.to_string());
            hub.broadcast_excluding(&room, &event, connection_id);
        }
    }
    metrics::VOICE_SIGNALS_TOTAL.inc();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use uuid::Uuid;

    fn connect(hub: &Hub, user_id: i64) -> (ConnectionId, UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (hub.connect(user_id, tx), rx)
    }

    fn drain(rx: &mut UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn peer_joined_ids(events: &[ServerEvent]) -> Vec<i64> {
        events
            .iter()
            .filter_map(|e| match e {
                ServerEvent::VoicePeerJoined { user_id } => Some(*user_id),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_join_empty_room_announces_nothing() {
        let hub = Hub::new();
        let (c1, mut rx1) = connect(&hub, 1);

        join(&hub, c1, "lobby");

        assert!(drain(&mut rx1).is_empty());
    }

    #[tokio::test]
    async fn test_second_join_announces_to_first_only() {
        let hub = Hub::new();
        let (c1, mut rx1) = connect(&hub, 1);
        let (c2, mut rx2) = connect(&hub, 2);

        join(&hub, c1, "lobby");
        join(&hub, c2, "lobby");

        assert_eq!(peer_joined_ids(&drain(&mut rx1)), vec![2]);
        assert!(drain(&mut rx2).is_empty());
    }

    #[tokio::test]
    async fn test_three_joins_announce_in_order() {
        // C1, C2, C3 join voice:lobby in order: C2's join notifies C1 only;
        // C3's join notifies C1 and C2.
        let hub = Hub::new();
        let (c1, mut rx1) = connect(&hub, 1);
        let (c2, mut rx2) = connect(&hub, 2);
        let (c3, mut rx3) = connect(&hub, 3);

        join(&hub, c1, "lobby");
        join(&hub, c2, "lobby");
        join(&hub, c3, "lobby");

        assert_eq!(peer_joined_ids(&drain(&mut rx1)), vec![2, 3]);
        assert_eq!(peer_joined_ids(&drain(&mut rx2)), vec![3]);
        assert!(drain(&mut rx3).is_empty());
    }

    #[tokio::test]
    async fn test_leave_notifies_remaining_participants() {
        let hub = Hub::new();
        let (c1, mut rx1) = connect(&hub, 1);
        let (c2, _rx2) = connect(&hub, 2);

        join(&hub, c1, "lobby");
        join(&hub, c2, "lobby");
        drain(&mut rx1);

        leave(&hub, c2, "lobby");

        let events = drain(&mut rx1);
        assert_eq!(events.len(), 1);
        match &events[0] {
            ServerEvent::VoicePeerLeft { user_id } => assert_eq!(*user_id, 2),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_broadcast_signal_excludes_sender() {
        let hub = Hub::new();
        let (c1, mut rx1) = connect(&hub, 1);
        let (c2, mut rx2) = connect(&hub, 2);

        join(&hub, c1, "lobby");
        join(&hub, c2, "lobby");
        drain(&mut rx1);

        signal(&hub, c1, "lobby", json!({"sdp": "offer"}), None);

        assert!(drain(&mut rx1).is_empty());
        let events = drain(&mut rx2);
        assert_eq!(events.len(), 1);
        match &events[0] {
            ServerEvent::VoiceSignal { from, data } => {
                assert_eq!(*from, c1);
                assert_eq!(data["sdp"], "offer");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_targeted_signal_reaches_only_target() {
        let hub = Hub::new();
        let (c1, _rx1) = connect(&hub, 1);
        let (c2, mut rx2) = connect(&hub, 2);
        let (c3, mut rx3) = connect(&hub, 3);

        join(&hub, c1, "lobby");
        join(&hub, c2, "lobby");
        join(&hub, c3, "lobby");
        drain(&mut rx2);
        drain(&mut rx3);

        signal(&hub, c1, "lobby", json!({"candidate": "x"}), Some(c2));

        assert_eq!(drain(&mut rx2).len(), 1);
        assert!(drain(&mut rx3).is_empty());
    }

    #[tokio::test]
    async fn test_targeted_signal_to_departed_connection_is_dropped() {
        let hub = Hub::new();
        let (c1, _rx1) = connect(&hub, 1);
        let (c2, mut rx2) = connect(&hub, 2);

        join(&hub, c1, "lobby");
        join(&hub, c2, "lobby");
        drain(&mut rx2);

        // Target never existed; the drop must not disturb other participants.
        signal(&hub, c1, "lobby", json!({}), Some(Uuid::new_v4()));
        signal(&hub, c1, "lobby", json!({"sdp": "offer"}), None);

        let events = drain(&mut rx2);
        assert_eq!(events.len(), 1);
    }
}
