//! Value Objects
//!
//! Immutable value types used across the domain.

pub mod room;

pub use room::{RoomKey, RoomKeyError};
