//! Group Handlers

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{CreateChannelRequest, CreateGroupRequest, InviteRequest};
use crate::application::dto::response::{ChannelResponse, GroupOverviewResponse, GroupResponse};
use crate::application::services::{GroupError, GroupService, GroupServiceImpl};
use crate::infrastructure::repositories::{
    PgChannelRepository, PgGroupRepository, PgUserRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn group_service(
    state: &AppState,
) -> GroupServiceImpl<PgUserRepository, PgGroupRepository, PgChannelRepository> {
    GroupServiceImpl::new(
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(PgGroupRepository::new(state.db.clone())),
        Arc::new(PgChannelRepository::new(state.db.clone())),
    )
}

fn map_group_error(e: GroupError) -> AppError {
    match e {
        GroupError::GroupNotFound => AppError::NotFound("Group not found".into()),
        GroupError::UserNotFound => AppError::NotFound("User not found".into()),
        GroupError::NotMember => AppError::Forbidden("Not a member of this group".into()),
        GroupError::AlreadyMember => AppError::Conflict("Already in group".into()),
        GroupError::Repository(e) => e,
    }
}

/// Create a group; the creator becomes owner and first member
pub async fn create_group(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let group = group_service(&state)
        .create_group(auth.user_id, &body.name)
        .await
        .map_err(map_group_error)?;

    Ok((StatusCode::CREATED, Json(GroupResponse::from(group))))
}

/// List the caller's groups with members and channels
pub async fn my_groups(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<GroupOverviewResponse>>, AppError> {
    let overviews = group_service(&state)
        .my_groups(auth.user_id)
        .await
        .map_err(map_group_error)?;

    Ok(Json(
        overviews
            .into_iter()
            .map(GroupOverviewResponse::from)
            .collect(),
    ))
}

/// Invite a user into a group by username
pub async fn invite(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(group_id): Path<i64>,
    Json(body): Json<InviteRequest>,
) -> Result<StatusCode, AppError> {
    body.validate().map_err(validation_error)?;

    group_service(&state)
        .invite(group_id, auth.user_id, &body.username)
        .await
        .map_err(map_group_error)?;

    Ok(StatusCode::CREATED)
}

/// Create a channel inside a group
pub async fn create_channel(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(group_id): Path<i64>,
    Json(body): Json<CreateChannelRequest>,
) -> Result<(StatusCode, Json<ChannelResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let channel = group_service(&state)
        .create_channel(group_id, auth.user_id, &body.name)
        .await
        .map_err(map_group_error)?;

    Ok((StatusCode::CREATED, Json(ChannelResponse::from(channel))))
}
