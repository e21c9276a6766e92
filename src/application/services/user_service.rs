//! User Service
//!
//! Profile lookup and settings updates.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{ProfilePatch, User, UserRepository};
use crate::shared::error::AppError;

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// Fetch a user by id
    async fn get_user(&self, id: i64) -> Result<User, UserError>;

    /// Apply a profile patch, rejecting username collisions
    async fn update_profile(&self, id: i64, patch: ProfilePatch) -> Result<User, UserError>;
}

/// User service errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Username already in use")]
    UsernameTaken,

    #[error(transparent)]
    Repository(#[from] AppError),
}

/// UserService implementation
pub struct UserServiceImpl<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UserServiceImpl<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }
}

#[async_trait]
impl<U> UserService for UserServiceImpl<U>
where
    U: UserRepository,
{
    async fn get_user(&self, id: i64) -> Result<User, UserError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound)
    }

    async fn update_profile(&self, id: i64, patch: ProfilePatch) -> Result<User, UserError> {
        if let Some(username) = &patch.username {
            if self.user_repo.username_taken(username, Some(id)).await? {
                return Err(UserError::UsernameTaken);
            }
        }

        let user = self.user_repo.update_profile(id, &patch).await?;
        tracing::debug!(user_id = id, "Profile updated");
        Ok(user)
    }
}
