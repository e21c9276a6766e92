//! Repository Implementations
//!
//! PostgreSQL implementations of the domain repository traits.

pub mod channel_repository;
pub mod friend_repository;
pub mod group_repository;
pub mod message_repository;
pub mod user_repository;

pub use channel_repository::PgChannelRepository;
pub use friend_repository::PgFriendRepository;
pub use group_repository::PgGroupRepository;
pub use message_repository::PgMessageRepository;
pub use user_repository::PgUserRepository;
