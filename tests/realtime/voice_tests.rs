//! Voice signaling relay tests

use serde_json::json;

use parley::presentation::realtime::{voice, Hub, ServerEvent};

use crate::common::connect;

fn as_json(event: &ServerEvent) -> serde_json::Value {
    serde_json::to_value(event).unwrap()
}

#[tokio::test]
async fn test_join_announces_to_existing_participants() {
    let hub = Hub::new();
    let mut alice = connect(&hub, 1);
    let mut bob = connect(&hub, 2);

    voice::join(&hub, alice.id, "standup");
    // Nobody else in the room yet, nothing announced
    assert!(alice.drain().is_empty());

    voice::join(&hub, bob.id, "standup");

    let events = alice.drain();
    assert_eq!(events.len(), 1);
    let frame = as_json(&events[0]);
    assert_eq!(frame["event"], "voice:peer-joined");
    assert_eq!(frame["data"]["userId"], 2);

    // The newcomer is not announced to themselves
    assert!(bob.drain().is_empty());
}

#[tokio::test]
async fn test_leave_notifies_remaining_participants() {
    let hub = Hub::new();
    let mut alice = connect(&hub, 1);
    let mut bob = connect(&hub, 2);

    voice::join(&hub, alice.id, "standup");
    voice::join(&hub, bob.id, "standup");
    alice.drain();

    voice::leave(&hub, bob.id, "standup");

    let events = alice.drain();
    assert_eq!(events.len(), 1);
    let frame = as_json(&events[0]);
    assert_eq!(frame["event"], "voice:peer-left");
    assert_eq!(frame["data"]["userId"], 2);
}

#[tokio::test]
async fn test_disconnect_notifies_voice_rooms() {
    let hub = Hub::new();
    let mut alice = connect(&hub, 1);
    let bob = connect(&hub, 2);

    voice::join(&hub, alice.id, "standup");
    voice::join(&hub, bob.id, "standup");
    alice.drain();

    // An abrupt disconnect behaves like a leave for voice rooms
    hub.disconnect(bob.id);

    let events = alice.drain();
    assert_eq!(events.len(), 1);
    assert_eq!(as_json(&events[0])["event"], "voice:peer-left");
}

#[tokio::test]
async fn test_targeted_signal_reaches_only_target() {
    let hub = Hub::new();
    let alice = connect(&hub, 1);
    let mut bob = connect(&hub, 2);
    let mut carol = connect(&hub, 3);

    voice::join(&hub, alice.id, "standup");
    voice::join(&hub, bob.id, "standup");
    voice::join(&hub, carol.id, "standup");
    bob.drain();
    carol.drain();

    let offer = json!({"sdp": "v=0...", "kind": "offer"});
    voice::signal(&hub, alice.id, "standup", offer.clone(), Some(bob.id));

    let events = bob.drain();
    assert_eq!(events.len(), 1);
    let frame = as_json(&events[0]);
    assert_eq!(frame["event"], "voice:signal");
    assert_eq!(frame["data"]["from"], alice.id.to_string());
    assert_eq!(frame["data"]["data"], offer);

    assert!(carol.drain().is_empty());
}

#[tokio::test]
async fn test_untargeted_signal_fans_out_excluding_sender() {
    let hub = Hub::new();
    let mut alice = connect(&hub, 1);
    let mut bob = connect(&hub, 2);
    let mut carol = connect(&hub, 3);

    voice::join(&hub, alice.id, "standup");
    voice::join(&hub, bob.id, "standup");
    voice::join(&hub, carol.id, "standup");
    alice.drain();
    bob.drain();
    carol.drain();

    voice::signal(&hub, alice.id, "standup", json!({"candidate": "..."}), None);

    assert!(alice.drain().is_empty());
    assert_eq!(bob.drain().len(), 1);
    assert_eq!(carol.drain().len(), 1);
}

#[tokio::test]
async fn test_signal_to_departed_target_is_dropped() {
    let hub = Hub::new();
    let alice = connect(&hub, 1);
    let bob = connect(&hub, 2);

    voice::join(&hub, alice.id, "standup");
    voice::join(&hub, bob.id, "standup");
    let bob_id = bob.id;
    hub.disconnect(bob_id);

    // Must not panic or leak; the relay drops it silently
    voice::signal(&hub, alice.id, "standup", json!({"sdp": "late"}), Some(bob_id));
}

#[tokio::test]
async fn test_two_voice_rooms_are_isolated() {
    let hub = Hub::new();
    let mut alice = connect(&hub, 1);
    let mut bob = connect(&hub, 2);

    voice::join(&hub, alice.id, "standup");
    voice::join(&hub, bob.id, "retro");

    // Different rooms, no announcements crossed
    assert!(alice.drain().is_empty());
    assert!(bob.drain().is_empty());

    voice::signal(&hub, alice.id, "standup", json!({"sdp": "x"}), None);
    assert!(bob.drain().is_empty());
}
