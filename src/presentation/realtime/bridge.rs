//! Session bridge.
//!
//! Correlates an inbound WebSocket handshake with the identity the HTTP auth
//! layer established when it issued the access token. Invoked exactly once
//! per connection attempt, before the hub accepts the connection; handshakes
//! without a valid identity are refused with 401 and never reach the
//! registry.

use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::domain::{User, UserRepository};
use crate::infrastructure::repositories::PgUserRepository;
use crate::presentation::middleware::Claims;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Resolve the authenticated identity behind a handshake token.
///
/// The token is the same JWT the HTTP layer issues at login; browsers cannot
/// set headers on a WebSocket upgrade, so it arrives as a `?token=` query
/// parameter (an `Authorization: Bearer` header is also accepted).
pub async fn resolve_identity(state: &AppState, token: Option<&str>) -> Result<User, AppError> {
    let token = token.ok_or_else(|| AppError::Unauthorized("Missing handshake token".into()))?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.settings.jwt.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("Token expired".into())
        }
        _ => AppError::Unauthorized("Invalid token".into()),
    })?;

    let user_id: i64 = token_data
        .claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid token claims".into()))?;

    let user_repo = PgUserRepository::new(state.db.clone());
    user_repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown identity".into()))
}
