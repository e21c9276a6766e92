//! Message Service
//!
//! Authorizes, persists and hydrates messages. Delivery is NOT triggered
//! here: the HTTP handler fans the returned payload out only after this
//! service has reported successful persistence, so a storage failure can
//! never produce a partial fan-out.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    Attachment, ChannelRepository, FriendRepository, GroupRepository, HistoryScope, Message,
    MessageKind, MessageRepository, Profile, UserRepository,
};
use crate::presentation::realtime::MessagePayload;
use crate::shared::error::AppError;

/// Message service trait
#[async_trait]
pub trait MessageService: Send + Sync {
    /// Authorize and persist a message, returning the hydrated payload ready
    /// for fan-out
    async fn send(&self, sender_id: i64, dto: SendMessageDto)
        -> Result<MessagePayload, MessageError>;

    /// Fetch history for a conversation scope the user is allowed to read
    async fn history(
        &self,
        user_id: i64,
        query: HistoryQueryDto,
    ) -> Result<Vec<MessagePayload>, MessageError>;
}

/// Send request
#[derive(Debug, Clone)]
pub struct SendMessageDto {
    pub kind: MessageKind,
    /// Recipient user id (direct) or group id (group)
    pub target_id: Option<i64>,
    /// Channel id (channel messages only)
    pub channel_id: Option<i64>,
    pub content: String,
    pub attachments: Vec<Attachment>,
}

/// History request
#[derive(Debug, Clone)]
pub struct HistoryQueryDto {
    pub kind: MessageKind,
    pub target_id: Option<i64>,
    pub channel_id: Option<i64>,
    pub limit: Option<i64>,
}

const DEFAULT_HISTORY_LIMIT: i64 = 50;
const MAX_HISTORY_LIMIT: i64 = 100;

/// Message service errors
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Not friends")]
    NotFriends,

    #[error("Not in group")]
    NotInGroup,

    #[error("Channel not found")]
    ChannelNotFound,

    #[error("Missing target for message kind")]
    MissingTarget,

    #[error("Sender not found")]
    SenderNotFound,

    #[error(transparent)]
    Repository(#[from] AppError),
}

/// MessageService implementation
pub struct MessageServiceImpl<M, U, F, G, C>
where
    M: MessageRepository,
    U: UserRepository,
    F: FriendRepository,
    G: GroupRepository,
    C: ChannelRepository,
{
    message_repo: Arc<M>,
    user_repo: Arc<U>,
    friend_repo: Arc<F>,
    group_repo: Arc<G>,
    channel_repo: Arc<C>,
}

impl<M, U, F, G, C> MessageServiceImpl<M, U, F, G, C>
where
    M: MessageRepository,
    U: UserRepository,
    F: FriendRepository,
    G: GroupRepository,
    C: ChannelRepository,
{
    pub fn new(
        message_repo: Arc<M>,
        user_repo: Arc<U>,
        friend_repo: Arc<F>,
        group_repo: Arc<G>,
        channel_repo: Arc<C>,
    ) -> Self {
        Self {
            message_repo,
            user_repo,
            friend_repo,
            group_repo,
            channel_repo,
        }
    }

    /// Check that the sender may address this target. Direct messages demand
    /// accepted friendship rows in both directions; group and channel
    /// messages demand current membership of the owning group.
    async fn authorize(&self, sender_id: i64, dto: &SendMessageDto) -> Result<(), MessageError> {
        match dto.kind {
            MessageKind::Direct => {
                let target_id = dto.target_id.ok_or(MessageError::MissingTarget)?;
                if !self
                    .friend_repo
                    .accepted_both_ways(sender_id, target_id)
                    .await?
                {
                    return Err(MessageError::NotFriends);
                }
            }
            MessageKind::Group => {
                let group_id = dto.target_id.ok_or(MessageError::MissingTarget)?;
                if !self.group_repo.is_member(group_id, sender_id).await? {
                    return Err(MessageError::NotInGroup);
                }
            }
            MessageKind::Channel => {
                let channel_id = dto.channel_id.ok_or(MessageError::MissingTarget)?;
                let channel = self
                    .channel_repo
                    .find_by_id(channel_id)
                    .await?
                    .ok_or(MessageError::ChannelNotFound)?;
                if !self
                    .group_repo
                    .is_member(channel.group_id, sender_id)
                    .await?
                {
                    return Err(MessageError::NotInGroup);
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<M, U, F, G, C> MessageService for MessageServiceImpl<M, U, F, G, C>
where
    M: MessageRepository,
    U: UserRepository,
    F: FriendRepository,
    G: GroupRepository,
    C: ChannelRepository,
{
    async fn send(
        &self,
        sender_id: i64,
        dto: SendMessageDto,
    ) -> Result<MessagePayload, MessageError> {
        self.authorize(sender_id, &dto).await?;

        let sender = self
            .user_repo
            .find_by_id(sender_id)
            .await?
            .ok_or(MessageError::SenderNotFound)?;

        let message = Message {
            id: Uuid::now_v7(),
            kind: dto.kind,
            sender_id,
            target_id: dto.target_id,
            channel_id: dto.channel_id,
            content: dto.content,
            attachments: dto.attachments,
            created_at: Utc::now(),
        };

        self.message_repo.create(&message).await?;
        tracing::debug!(message_id = %message.id, kind = %message.kind, "Message persisted");

        Ok(MessagePayload {
            id: message.id,
            kind: message.kind,
            sender: Profile::from(&sender),
            target_id: message.target_id,
            channel_id: message.channel_id,
            content: message.content,
            attachments: message.attachments,
            created_at: message.created_at,
        })
    }

    async fn history(
        &self,
        user_id: i64,
        query: HistoryQueryDto,
    ) -> Result<Vec<MessagePayload>, MessageError> {
        let scope = match query.kind {
            MessageKind::Direct => {
                let other_id = query.target_id.ok_or(MessageError::MissingTarget)?;
                HistoryScope::Direct { user_id, other_id }
            }
            MessageKind::Group => {
                let group_id = query.target_id.ok_or(MessageError::MissingTarget)?;
                if !self.group_repo.is_member(group_id, user_id).await? {
                    return Err(MessageError::NotInGroup);
                }
                HistoryScope::Group { group_id }
            }
            MessageKind::Channel => {
                let channel_id = query.channel_id.ok_or(MessageError::MissingTarget)?;
                let channel = self
                    .channel_repo
                    .find_by_id(channel_id)
                    .await?
                    .ok_or(MessageError::ChannelNotFound)?;
                if !self.group_repo.is_member(channel.group_id, user_id).await? {
                    return Err(MessageError::NotInGroup);
                }
                HistoryScope::Channel { channel_id }
            }
        };

        let limit = query
            .limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);

        let rows = self.message_repo.history(scope, limit).await?;
        Ok(rows.into_iter().map(MessagePayload::from).collect())
    }
}
