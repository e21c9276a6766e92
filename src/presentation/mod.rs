//! Presentation Layer
//!
//! HTTP routes, middleware, and the real-time WebSocket subsystem.

pub mod http;
pub mod middleware;
pub mod realtime;
