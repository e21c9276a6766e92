//! Friend Repository Implementation
//!
//! PostgreSQL implementation of the FriendRepository trait. Acceptance writes
//! both directions of the pair inside one transaction so the symmetric
//! invariant always holds.

use async_trait::async_trait;
use sqlx::PgPool;

use super::user_repository::ProfileRow;
use crate::domain::{FriendRepository, FriendStatus, Profile};
use crate::shared::error::AppError;

/// PostgreSQL friend repository implementation.
#[derive(Clone)]
pub struct PgFriendRepository {
    pool: PgPool,
}

impl PgFriendRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FriendRepository for PgFriendRepository {
    async fn link_exists(&self, user_id: i64, other_id: i64) -> Result<bool, AppError> {
        let row: Option<(i32,)> = sqlx::query_as(
            r#"
            SELECT 1 FROM friends
            WHERE (user_id = $1 AND friend_id = $2)
               OR (user_id = $2 AND friend_id = $1)
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(other_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    async fn create_accepted_pair(&self, user_id: i64, friend_id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO friends (user_id, friend_id, status) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(friend_id)
            .bind(FriendStatus::Accepted.as_str())
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO friends (user_id, friend_id, status) VALUES ($1, $2, $3)")
            .bind(friend_id)
            .bind(user_id)
            .bind(FriendStatus::Accepted.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn accepted_both_ways(&self, user_id: i64, other_id: i64) -> Result<bool, AppError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM friends
            WHERE ((user_id = $1 AND friend_id = $2)
                OR (user_id = $2 AND friend_id = $1))
              AND status = 'accepted'
            "#,
        )
        .bind(user_id)
        .bind(other_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count == 2)
    }

    async fn list_accepted(&self, user_id: i64) -> Result<Vec<Profile>, AppError> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT u.id, u.username, u.avatar_url
            FROM friends f
            JOIN users u ON u.id = f.friend_id
            WHERE f.user_id = $1 AND f.status = 'accepted'
            ORDER BY u.username
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_profile()).collect())
    }
}
