//! Application Services
//!
//! Business logic services orchestrating domain repositories.

pub mod auth_service;
pub mod friend_service;
pub mod group_service;
pub mod message_service;
pub mod user_service;

pub use auth_service::{AuthError, AuthService, AuthServiceImpl, AuthToken};
pub use friend_service::{FriendError, FriendService, FriendServiceImpl};
pub use group_service::{GroupError, GroupOverview, GroupService, GroupServiceImpl};
pub use message_service::{
    HistoryQueryDto, MessageError, MessageService, MessageServiceImpl, SendMessageDto,
};
pub use user_service::{UserError, UserService, UserServiceImpl};
