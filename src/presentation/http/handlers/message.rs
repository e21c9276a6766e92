//! Message Handlers
//!
//! Send persists through the message service first and fans out to live
//! connections only after the row is committed, so a storage failure never
//! produces a delivery without a durable message behind it.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::{HistoryQuery, SendMessageRequest};
use crate::application::services::{
    HistoryQueryDto, MessageError, MessageService, MessageServiceImpl, SendMessageDto,
};
use crate::infrastructure::repositories::{
    PgChannelRepository, PgFriendRepository, PgGroupRepository, PgMessageRepository,
    PgUserRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::presentation::realtime::{fanout, MessagePayload};
use crate::shared::error::AppError;
use crate::startup::AppState;

const MAX_CONTENT_LENGTH: usize = 4000;

type PgMessageService = MessageServiceImpl<
    PgMessageRepository,
    PgUserRepository,
    PgFriendRepository,
    PgGroupRepository,
    PgChannelRepository,
>;

fn message_service(state: &AppState) -> PgMessageService {
    MessageServiceImpl::new(
        Arc::new(PgMessageRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(PgFriendRepository::new(state.db.clone())),
        Arc::new(PgGroupRepository::new(state.db.clone())),
        Arc::new(PgChannelRepository::new(state.db.clone())),
    )
}

fn map_message_error(e: MessageError) -> AppError {
    match e {
        MessageError::NotFriends => AppError::Forbidden("Not friends with this user".into()),
        MessageError::NotInGroup => AppError::Forbidden("Not a member of this group".into()),
        MessageError::ChannelNotFound => AppError::NotFound("Channel not found".into()),
        MessageError::MissingTarget => {
            AppError::BadRequest("Missing target for message type".into())
        }
        MessageError::SenderNotFound => AppError::Unauthorized("Unknown identity".into()),
        MessageError::Repository(e) => e,
    }
}

/// Send a message; delivery to live connections happens after persistence
pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessagePayload>), AppError> {
    if body.content.is_empty() && body.attachments.is_empty() {
        return Err(AppError::BadRequest("Message is empty".into()));
    }
    if body.content.len() > MAX_CONTENT_LENGTH {
        return Err(AppError::BadRequest("Message content too long".into()));
    }

    let dto = SendMessageDto {
        kind: body.kind,
        target_id: body.target_id,
        channel_id: body.channel_id,
        content: body.content,
        attachments: body.attachments,
    };

    let payload = message_service(&state)
        .send(auth.user_id, dto)
        .await
        .map_err(map_message_error)?;

    fanout::deliver(&state.hub, payload.clone());

    Ok((StatusCode::CREATED, Json(payload)))
}

/// Fetch message history for a conversation the caller may read
pub async fn get_history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MessagePayload>>, AppError> {
    let dto = HistoryQueryDto {
        kind: query.kind,
        target_id: query.target_id,
        channel_id: query.channel_id,
        limit: query.limit,
    };

    let messages = message_service(&state)
        .history(auth.user_id, dto)
        .await
        .map_err(map_message_error)?;

    Ok(Json(messages))
}
