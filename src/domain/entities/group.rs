//! Group entity and repository trait.
//!
//! Maps to the `groups` and `group_members` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::Profile;
use crate::shared::error::AppError;

/// A named group of users; the container for channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Repository trait for Group data access operations.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Find a group by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Group>, AppError>;

    /// Create a group and enroll the owner as its first member, atomically.
    async fn create_with_owner(&self, name: &str, owner_id: i64) -> Result<Group, AppError>;

    /// Check whether a user is a member of a group.
    async fn is_member(&self, group_id: i64, user_id: i64) -> Result<bool, AppError>;

    /// Enroll a user into a group.
    async fn add_member(&self, group_id: i64, user_id: i64) -> Result<(), AppError>;

    /// List the members of a group.
    async fn members(&self, group_id: i64) -> Result<Vec<Profile>, AppError>;

    /// List the groups a user belongs to.
    async fn groups_of(&self, user_id: i64) -> Result<Vec<Group>, AppError>;
}
