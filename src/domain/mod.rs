//! # Domain Layer
//!
//! Core business types of the messaging platform, independent of any
//! framework or infrastructure concern.
//!
//! - **entities**: User, Friendship, Group, Channel, Message and their
//!   repository traits
//! - **value_objects**: immutable value types (RoomKey)

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
