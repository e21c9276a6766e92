//! Friend Handlers

use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::AddFriendRequest;
use crate::application::services::{FriendError, FriendService, FriendServiceImpl};
use crate::domain::Profile;
use crate::infrastructure::repositories::{PgFriendRepository, PgUserRepository};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn friend_service(state: &AppState) -> FriendServiceImpl<PgUserRepository, PgFriendRepository> {
    FriendServiceImpl::new(
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(PgFriendRepository::new(state.db.clone())),
    )
}

fn map_friend_error(e: FriendError) -> AppError {
    match e {
        FriendError::UserNotFound => AppError::NotFound("User not found".into()),
        FriendError::SelfFriend => AppError::BadRequest("Cannot add yourself".into()),
        FriendError::AlreadyLinked => AppError::Conflict("Already friends or pending".into()),
        FriendError::Repository(e) => e,
    }
}

/// Add a friend by username
pub async fn add_friend(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<AddFriendRequest>,
) -> Result<StatusCode, AppError> {
    body.validate().map_err(validation_error)?;

    friend_service(&state)
        .add_friend(auth.user_id, &body.username)
        .await
        .map_err(map_friend_error)?;

    Ok(StatusCode::CREATED)
}

/// List accepted friends
pub async fn list_friends(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Profile>>, AppError> {
    let friends = friend_service(&state)
        .list_friends(auth.user_id)
        .await
        .map_err(map_friend_error)?;

    Ok(Json(friends))
}
