//! Channel entity and repository trait.
//!
//! A channel is scoped to exactly one group.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A named message channel inside a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Repository trait for Channel data access operations.
#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Find a channel by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Channel>, AppError>;

    /// Create a channel inside a group.
    async fn create(&self, group_id: i64, name: &str) -> Result<Channel, AppError>;

    /// List the channels of a group.
    async fn by_group(&self, group_id: i64) -> Result<Vec<Channel>, AppError>;
}
