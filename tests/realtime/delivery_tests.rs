//! Message fan-out and room delivery tests
//!
//! Drives the hub through its public API the way the WebSocket handler
//! does, without a server or database.

use parley::domain::RoomKey;
use parley::presentation::realtime::{fanout, Hub, ServerEvent};

use crate::common::{channel_payload, connect, direct_payload, group_payload};

fn as_json(event: &ServerEvent) -> serde_json::Value {
    serde_json::to_value(event).unwrap()
}

#[tokio::test]
async fn test_direct_message_reaches_recipient_and_sender() {
    let hub = Hub::new();
    let mut alice = connect(&hub, 1);
    let mut bob = connect(&hub, 2);

    fanout::deliver(&hub, direct_payload(1, 2, "hi bob"));

    let bob_events = bob.drain();
    assert_eq!(bob_events.len(), 1);
    let frame = as_json(&bob_events[0]);
    assert_eq!(frame["event"], "msg:new");
    assert_eq!(frame["data"]["content"], "hi bob");
    assert_eq!(frame["data"]["sender"]["id"], 1);

    // The sender's personal room gets the echo for their other devices
    let alice_events = alice.drain();
    assert_eq!(alice_events.len(), 1);
    assert_eq!(as_json(&alice_events[0])["data"]["content"], "hi bob");
}

#[tokio::test]
async fn test_direct_message_reaches_all_recipient_devices() {
    let hub = Hub::new();
    let _alice = connect(&hub, 1);
    let mut bob_laptop = connect(&hub, 2);
    let mut bob_phone = connect(&hub, 2);

    fanout::deliver(&hub, direct_payload(1, 2, "multi"));

    assert_eq!(bob_laptop.drain().len(), 1);
    assert_eq!(bob_phone.drain().len(), 1);
}

#[tokio::test]
async fn test_direct_message_to_offline_user_delivers_nowhere() {
    let hub = Hub::new();
    let mut alice = connect(&hub, 1);

    // User 99 has no connection; only the sender echo goes out
    fanout::deliver(&hub, direct_payload(1, 99, "anyone there"));

    assert_eq!(alice.drain().len(), 1);
}

#[tokio::test]
async fn test_group_message_reaches_joined_members_only() {
    let hub = Hub::new();
    let mut alice = connect(&hub, 1);
    let mut bob = connect(&hub, 2);
    let mut carol = connect(&hub, 3);

    hub.join(alice.id, RoomKey::Group(10));
    hub.join(bob.id, RoomKey::Group(10));
    // Carol is connected but never joined the group room

    fanout::deliver(&hub, group_payload(1, 10, "meeting at 5"));

    assert_eq!(alice.drain().len(), 1);
    assert_eq!(bob.drain().len(), 1);
    assert!(carol.drain().is_empty());
}

#[tokio::test]
async fn test_channel_message_addresses_channel_room() {
    let hub = Hub::new();
    let mut alice = connect(&hub, 1);
    let mut bob = connect(&hub, 2);

    hub.join(alice.id, RoomKey::Channel(7));
    hub.join(bob.id, RoomKey::Channel(7));

    fanout::deliver(&hub, channel_payload(1, 7, "channel msg"));

    let frame = as_json(&bob.drain()[0]);
    assert_eq!(frame["data"]["channel_id"], 7);
    assert_eq!(alice.drain().len(), 1);
}

#[tokio::test]
async fn test_messages_arrive_in_send_order() {
    let hub = Hub::new();
    let _alice = connect(&hub, 1);
    let mut bob = connect(&hub, 2);

    for i in 0..5 {
        fanout::deliver(&hub, direct_payload(1, 2, &format!("msg-{}", i)));
    }

    let contents: Vec<String> = bob
        .drain()
        .iter()
        .map(|e| as_json(e)["data"]["content"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(contents, vec!["msg-0", "msg-1", "msg-2", "msg-3", "msg-4"]);
}

#[tokio::test]
async fn test_typing_reaches_room_members() {
    let hub = Hub::new();
    let alice = connect(&hub, 1);
    let mut bob = connect(&hub, 2);

    hub.join(alice.id, RoomKey::Group(10));
    hub.join(bob.id, RoomKey::Group(10));

    hub.notify_typing(alice.id, &RoomKey::Group(10));

    let events = bob.drain();
    assert_eq!(events.len(), 1);
    let frame = as_json(&events[0]);
    assert_eq!(frame["event"], "typing");
    assert_eq!(frame["data"]["userId"], 1);
    assert_eq!(frame["data"]["room"], "group:10");
}

#[tokio::test]
async fn test_left_room_receives_nothing() {
    let hub = Hub::new();
    let _alice = connect(&hub, 1);
    let mut bob = connect(&hub, 2);

    hub.join(bob.id, RoomKey::Group(10));
    hub.leave(bob.id, &RoomKey::Group(10));

    fanout::deliver(&hub, group_payload(1, 10, "after leave"));

    assert!(bob.drain().is_empty());
}

#[tokio::test]
async fn test_disconnected_connection_receives_nothing() {
    let hub = Hub::new();
    let _alice = connect(&hub, 1);
    let mut bob = connect(&hub, 2);

    hub.disconnect(bob.id);
    fanout::deliver(&hub, direct_payload(1, 2, "gone"));

    assert!(bob.drain().is_empty());
}
