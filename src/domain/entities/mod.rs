//! Domain Entities
//!
//! Core entities and their repository traits.

pub mod channel;
pub mod friendship;
pub mod group;
pub mod message;
pub mod user;

pub use channel::{Channel, ChannelRepository};
pub use friendship::{FriendRepository, FriendStatus, Friendship};
pub use group::{Group, GroupRepository};
pub use message::{
    Attachment, HistoryScope, Message, MessageKind, MessageRepository, MessageWithSender,
};
pub use user::{Profile, ProfilePatch, User, UserRepository};
