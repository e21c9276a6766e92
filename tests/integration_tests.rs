//! Integration Tests Entry Point
//!
//! Tests are organized by module:
//! - `api/` - HTTP endpoint tests
//! - `realtime/` - connection registry, fan-out and signaling tests
//! - `common/` - shared test utilities

mod api;
mod common;
mod realtime;
