//! Real-time delivery subsystem.
//!
//! Connection registry and room membership (`hub`), message fan-out
//! (`fanout`), voice-call signaling relay (`voice`), the WebSocket wire
//! protocol (`events`), the session bridge (`bridge`) and the per-connection
//! handler (`handler`).

pub mod bridge;
pub mod events;
pub mod fanout;
pub mod handler;
pub mod hub;
pub mod voice;

pub use events::{ClientEvent, ConnectionId, MessagePayload, ServerEvent};
pub use handler::ws_handler;
pub use hub::Hub;
