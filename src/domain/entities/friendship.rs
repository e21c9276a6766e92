//! Friendship entity and repository trait.
//!
//! Friendships are a symmetric pair relation: acceptance is written as two
//! rows (A→B and B→A) in a single transaction, and both rows must exist for
//! direct-message authorization to pass.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::user::Profile;
use crate::shared::error::AppError;

/// Friendship status matching the `friends.status` VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    #[default]
    Pending,
    Accepted,
}

impl FriendStatus {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "accepted" => Self::Accepted,
            _ => Self::Pending,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
        }
    }
}

/// One direction of a friendship pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friendship {
    pub user_id: i64,
    pub friend_id: i64,
    pub status: FriendStatus,
}

/// Repository trait for Friendship data access operations.
#[async_trait]
pub trait FriendRepository: Send + Sync {
    /// Check whether any row links the two users, in either direction and
    /// any status.
    async fn link_exists(&self, user_id: i64, other_id: i64) -> Result<bool, AppError>;

    /// Write both accepted rows (A→B and B→A) atomically.
    async fn create_accepted_pair(&self, user_id: i64, friend_id: i64) -> Result<(), AppError>;

    /// Check that accepted rows exist in both directions.
    async fn accepted_both_ways(&self, user_id: i64, other_id: i64) -> Result<bool, AppError>;

    /// List accepted friends of a user.
    async fn list_accepted(&self, user_id: i64) -> Result<Vec<Profile>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_str() {
        assert_eq!(FriendStatus::from_str("accepted"), FriendStatus::Accepted);
        assert_eq!(FriendStatus::from_str("ACCEPTED"), FriendStatus::Accepted);
        assert_eq!(FriendStatus::from_str("pending"), FriendStatus::Pending);
        assert_eq!(FriendStatus::from_str("garbage"), FriendStatus::Pending);
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [FriendStatus::Pending, FriendStatus::Accepted] {
            assert_eq!(FriendStatus::from_str(status.as_str()), status);
        }
    }
}
