//! User Repository Implementation
//!
//! PostgreSQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Profile, ProfilePatch, User, UserRepository};
use crate::shared::error::AppError;

/// Database row representation matching the users table schema.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    avatar_url: Option<String>,
    bio: Option<String>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            avatar_url: self.avatar_url,
            bio: self.bio,
            created_at: self.created_at,
        }
    }
}

/// Public profile row used by friend and member listings.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProfileRow {
    pub id: i64,
    pub username: String,
    pub avatar_url: Option<String>,
}

impl ProfileRow {
    pub(crate) fn into_profile(self) -> Profile {
        Profile {
            id: self.id,
            username: self.username,
            avatar_url: self.avatar_url,
        }
    }
}

/// PostgreSQL user repository implementation.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, avatar_url, bio, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_user()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, avatar_url, bio, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_user()))
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, avatar_url, bio, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_user())
    }

    async fn update_profile(&self, id: i64, patch: &ProfilePatch) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                bio = COALESCE($3, bio),
                avatar_url = COALESCE($4, avatar_url)
            WHERE id = $1
            RETURNING id, username, password_hash, avatar_url, bio, created_at
            "#,
        )
        .bind(id)
        .bind(patch.username.as_deref())
        .bind(patch.bio.as_deref())
        .bind(patch.avatar_url.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_user())
    }

    async fn username_taken(
        &self,
        username: &str,
        excluding: Option<i64>,
    ) -> Result<bool, AppError> {
        let taken: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT id FROM users
            WHERE username = $1 AND ($2::BIGINT IS NULL OR id != $2)
            "#,
        )
        .bind(username)
        .bind(excluding)
        .fetch_optional(&self.pool)
        .await?;

        Ok(taken.is_some())
    }
}
