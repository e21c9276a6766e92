//! Friend Service
//!
//! Friendship creation and listing. Acceptance is immediate and symmetric:
//! both directions of the pair are written in one transaction.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{FriendRepository, Profile, UserRepository};
use crate::shared::error::AppError;

/// Friend service trait
#[async_trait]
pub trait FriendService: Send + Sync {
    /// Befriend another user by username
    async fn add_friend(&self, user_id: i64, username: &str) -> Result<(), FriendError>;

    /// List accepted friends
    async fn list_friends(&self, user_id: i64) -> Result<Vec<Profile>, FriendError>;
}

/// Friend service errors
#[derive(Debug, thiserror::Error)]
pub enum FriendError {
    #[error("User not found")]
    UserNotFound,

    #[error("Cannot add yourself")]
    SelfFriend,

    #[error("Already friends or pending")]
    AlreadyLinked,

    #[error(transparent)]
    Repository(#[from] AppError),
}

/// FriendService implementation
pub struct FriendServiceImpl<U, F>
where
    U: UserRepository,
    F: FriendRepository,
{
    user_repo: Arc<U>,
    friend_repo: Arc<F>,
}

impl<U, F> FriendServiceImpl<U, F>
where
    U: UserRepository,
    F: FriendRepository,
{
    pub fn new(user_repo: Arc<U>, friend_repo: Arc<F>) -> Self {
        Self {
            user_repo,
            friend_repo,
        }
    }
}

#[async_trait]
impl<U, F> FriendService for FriendServiceImpl<U, F>
where
    U: UserRepository,
    F: FriendRepository,
{
    async fn add_friend(&self, user_id: i64, username: &str) -> Result<(), FriendError> {
        let target = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(FriendError::UserNotFound)?;

        if target.id == user_id {
            return Err(FriendError::SelfFriend);
        }
        if self.friend_repo.link_exists(user_id, target.id).await? {
            return Err(FriendError::AlreadyLinked);
        }

        self.friend_repo
            .create_accepted_pair(user_id, target.id)
            .await?;

        tracing::info!(user_id, friend_id = target.id, "Friendship created");
        Ok(())
    }

    async fn list_friends(&self, user_id: i64) -> Result<Vec<Profile>, FriendError> {
        Ok(self.friend_repo.list_accepted(user_id).await?)
    }
}
