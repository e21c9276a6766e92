//! Connection and room registry.
//!
//! The `Hub` is the single owned registry of live connections and their room
//! memberships, shared by every connection task behind an `Arc`. Broadcasts
//! are fire-and-forget sends into per-connection unbounded channels; the
//! WebSocket task on the other end owns the actual network write. Nothing in
//! here blocks on I/O.
//!
//! Invariants:
//! - join/leave/disconnect are idempotent
//! - no room membership outlives its owning connection
//! - delivery to a connection removed mid-broadcast is skipped, never an error

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::events::{ConnectionId, ServerEvent};
use crate::domain::RoomKey;
use crate::infrastructure::metrics;

/// One live connection of an authenticated user.
pub struct Connection {
    pub id: ConnectionId,
    pub user_id: i64,
    sender: mpsc::UnboundedSender<ServerEvent>,
    /// Rooms this connection has joined, tracked for unconditional teardown.
    rooms: Mutex<HashSet<RoomKey>>,
}

/// Registry of live connections and room membership sets.
pub struct Hub {
    connections: DashMap<ConnectionId, Arc<Connection>>,
    rooms: DashMap<RoomKey, HashSet<ConnectionId>>,
}

impl Hub {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            rooms: DashMap::new(),
        }
    }

    /// Register a connection for an authenticated identity and auto-join its
    /// personal room.
    pub fn connect(
        &self,
        user_id: i64,
        sender: mpsc::UnboundedSender<ServerEvent>,
    ) -> ConnectionId {
        let id = Uuid::new_v4();
        let connection = Arc::new(Connection {
            id,
            user_id,
            sender,
            rooms: Mutex::new(HashSet::new()),
        });
        self.connections.insert(id, connection);
        self.join(id, RoomKey::user(user_id));
        metrics::WS_CONNECTIONS_ACTIVE.inc();

        tracing::info!(user_id, connection_id = %id, "Connection registered");
        id
    }

    /// Tear down a connection: remove it from every room it joined and, for
    /// voice rooms, notify the remaining participants. Idempotent; cleanup
    /// runs for all rooms regardless of individual removals.
    pub fn disconnect(&self, id: ConnectionId) {
        let Some((_, connection)) = self.connections.remove(&id) else {
            return;
        };
        metrics::WS_CONNECTIONS_ACTIVE.dec();

        let joined: Vec<RoomKey> = connection.rooms.lock().drain().collect();
        for room in joined {
            self.remove_membership(id, &room);
            if room.is_voice() {
                self.broadcast(
                    &room,
                    &ServerEvent::VoicePeerLeft {
                        user_id: connection.user_id,
                    },
                );
            }
        }

        tracing::info!(
            user_id = connection.user_id,
            connection_id = %id,
            "Connection unregistered"
        );
    }

    /// Join a connection to a room. Joining twice has no additional effect.
    /// A join for an unknown connection is silently ignored: the connection
    /// raced with its own teardown.
    pub fn join(&self, id: ConnectionId, room: RoomKey) {
        let Some(connection) = self.connections.get(&id).map(|c| Arc::clone(c.value())) else {
            tracing::debug!(connection_id = %id, room = %room, "Join for unknown connection");
            return;
        };
        connection.rooms.lock().insert(room.clone());
        self.rooms.entry(room).or_default().insert(id);
    }

    /// Remove a connection from a room. Idempotent.
    pub fn leave(&self, id: ConnectionId, room: &RoomKey) {
        if let Some(connection) = self.connections.get(&id) {
            connection.rooms.lock().remove(room);
        }
        self.remove_membership(id, room);
    }

    /// Deliver an event to every connection currently in the room.
    pub fn broadcast(&self, room: &RoomKey, event: &ServerEvent) {
        self.broadcast_inner(room, event, None);
    }

    /// Deliver an event to every room member except one connection.
    pub fn broadcast_excluding(&self, room: &RoomKey, event: &ServerEvent, exclude: ConnectionId) {
        self.broadcast_inner(room, event, Some(exclude));
    }

    /// Deliver an event to a single connection. Returns false when the target
    /// has no live connection; the caller decides whether that matters
    /// (signaling treats it as a silent drop).
    pub fn send_to(&self, id: ConnectionId, event: ServerEvent) -> bool {
        match self.connections.get(&id) {
            Some(connection) => connection.sender.send(event).is_ok(),
            None => false,
        }
    }

    /// Broadcast an ephemeral typing notification to a room. The sender is
    /// not excluded; clients drop typing events carrying their own identity.
    pub fn notify_typing(&self, id: ConnectionId, room: &RoomKey) {
        let Some(user_id) = self.user_id_of(id) else {
            return;
        };
        self.broadcast(
            room,
            &ServerEvent::Typing {
                user_id,
                room: room.to_string(),
            },
        );
    }

    /// Identity behind a connection, if it is still registered.
    pub fn user_id_of(&self, id: ConnectionId) -> Option<i64> {
        self.connections.get(&id).map(|c| c.user_id)
    }

    /// Current snapshot of a room's member connections.
    pub fn room_members(&self, room: &RoomKey) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    fn broadcast_inner(&self, room: &RoomKey, event: &ServerEvent, exclude: Option<ConnectionId>) {
        // Snapshot the member set so senders run outside the map entry lock.
        let members = self.room_members(room);
        let mut stale: Vec<ConnectionId> = Vec::new();

        for member in members {
            if Some(member) == exclude {
                continue;
            }
            match self.connections.get(&member) {
                Some(connection) => {
                    // A failed send means the receiver task is gone; teardown
                    // will reclaim the membership, nothing to do here.
                    let _ = connection.sender.send(event.clone());
                }
                None => stale.push(member),
            }
        }

        // Self-heal: membership entries referencing connections the registry
        // no longer knows about are pruned on access.
        for member in stale {
            tracing::warn!(
                connection_id = %member,
                room = %room,
                "Pruning stale room membership"
            );
            self.remove_membership(member, room);
        }
    }

    /// Remove one membership edge and drop the room entry once empty.
    fn remove_membership(&self, id: ConnectionId, room: &RoomKey) {
        if let Some(mut members) = self.rooms.get_mut(room) {
            members.remove(&id);
        }
        self.rooms.remove_if(room, |_, members| members.is_empty());
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}
