//! Authentication Service
//!
//! Handles registration, credential verification and JWT issuance.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;

use crate::config::JwtSettings;
use crate::domain::{User, UserRepository};
use crate::presentation::middleware::Claims;
use crate::shared::error::AppError;

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and sign them in
    async fn register(&self, username: &str, password: &str)
        -> Result<(User, AuthToken), AuthError>;

    /// Authenticate a user with credentials
    async fn login(&self, username: &str, password: &str) -> Result<(User, AuthToken), AuthError>;
}

/// Issued access token
#[derive(Debug, Clone, Serialize)]
pub struct AuthToken {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Repository(#[from] AppError),
}

/// AuthService implementation
pub struct AuthServiceImpl<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    jwt_settings: JwtSettings,
}

impl<U> AuthServiceImpl<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, jwt_settings: JwtSettings) -> Self {
        Self {
            user_repo,
            jwt_settings,
        }
    }

    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    fn issue_token(&self, user_id: i64) -> Result<AuthToken, AuthError> {
        let now = Utc::now();
        let expires_in = self.jwt_settings.access_token_expiry_minutes * 60;
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(expires_in)).timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Token signing failed: {}", e)))?;

        Ok(AuthToken {
            access_token,
            expires_in,
            token_type: "Bearer".to_string(),
        })
    }
}

#[async_trait]
impl<U> AuthService for AuthServiceImpl<U>
where
    U: UserRepository,
{
    async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(User, AuthToken), AuthError> {
        if self.user_repo.username_taken(username, None).await? {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = self.hash_password(password)?;
        let user = self.user_repo.create(username, &password_hash).await?;
        let token = self.issue_token(user.id)?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok((user, token))
    }

    async fn login(&self, username: &str, password: &str) -> Result<(User, AuthToken), AuthError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token(user.id)?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok((user, token))
    }
}
