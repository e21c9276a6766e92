//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a registered user account.
///
/// Maps to the `users` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - username: VARCHAR(32) NOT NULL UNIQUE
/// - password_hash: VARCHAR(255) NOT NULL
/// - avatar_url: TEXT NULL
/// - bio: TEXT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Stable integer primary key
    pub id: i64,

    /// Username (2-32 characters, unique)
    pub username: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// URL to the user's avatar image
    pub avatar_url: Option<String>,

    /// User's bio/about text
    pub bio: Option<String>,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Public slice of a user, embedded in friend lists, group member lists and
/// hydrated message payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub avatar_url: Option<String>,
}

impl From<&User> for Profile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

/// Fields of a profile update; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Repository trait for User data access operations.
///
/// Implementations of this trait handle the actual database interactions.
/// The trait is defined in the domain layer to maintain dependency inversion.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Create a new user with the given (already hashed) credentials.
    async fn create(&self, username: &str, password_hash: &str) -> Result<User, AppError>;

    /// Apply a profile patch, leaving `None` fields untouched.
    async fn update_profile(&self, id: i64, patch: &ProfilePatch) -> Result<User, AppError>;

    /// Check whether a username is taken by any user other than `excluding`.
    async fn username_taken(&self, username: &str, excluding: Option<i64>)
        -> Result<bool, AppError>;
}
