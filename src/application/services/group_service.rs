//! Group Service
//!
//! Group lifecycle: creation, invitations, channels, and the member's-eye
//! overview used by clients to build their sidebar.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Channel, ChannelRepository, Group, GroupRepository, Profile, UserRepository};
use crate::shared::error::AppError;

/// Group service trait
#[async_trait]
pub trait GroupService: Send + Sync {
    /// Create a group owned by `owner_id`; the owner becomes its first member
    async fn create_group(&self, owner_id: i64, name: &str) -> Result<Group, GroupError>;

    /// Invite a user into a group; only members may invite
    async fn invite(&self, group_id: i64, actor_id: i64, username: &str)
        -> Result<(), GroupError>;

    /// Create a channel inside a group; only members may create channels
    async fn create_channel(
        &self,
        group_id: i64,
        actor_id: i64,
        name: &str,
    ) -> Result<Channel, GroupError>;

    /// Groups the user belongs to, with members and channels resolved
    async fn my_groups(&self, user_id: i64) -> Result<Vec<GroupOverview>, GroupError>;
}

/// A group with its members and channels resolved.
#[derive(Debug, Clone)]
pub struct GroupOverview {
    pub group: Group,
    pub members: Vec<Profile>,
    pub channels: Vec<Channel>,
}

/// Group service errors
#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    #[error("Group not found")]
    GroupNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Not a member of this group")]
    NotMember,

    #[error("Already in group")]
    AlreadyMember,

    #[error(transparent)]
    Repository(#[from] AppError),
}

/// GroupService implementation
pub struct GroupServiceImpl<U, G, C>
where
    U: UserRepository,
    G: GroupRepository,
    C: ChannelRepository,
{
    user_repo: Arc<U>,
    group_repo: Arc<G>,
    channel_repo: Arc<C>,
}

impl<U, G, C> GroupServiceImpl<U, G, C>
where
    U: UserRepository,
    G: GroupRepository,
    C: ChannelRepository,
{
    pub fn new(user_repo: Arc<U>, group_repo: Arc<G>, channel_repo: Arc<C>) -> Self {
        Self {
            user_repo,
            group_repo,
            channel_repo,
        }
    }

    async fn require_member(&self, group_id: i64, user_id: i64) -> Result<(), GroupError> {
        if self.group_repo.find_by_id(group_id).await?.is_none() {
            return Err(GroupError::GroupNotFound);
        }
        if !self.group_repo.is_member(group_id, user_id).await? {
            return Err(GroupError::NotMember);
        }
        Ok(())
    }
}

#[async_trait]
impl<U, G, C> GroupService for GroupServiceImpl<U, G, C>
where
    U: UserRepository,
    G: GroupRepository,
    C: ChannelRepository,
{
    async fn create_group(&self, owner_id: i64, name: &str) -> Result<Group, GroupError> {
        let group = self.group_repo.create_with_owner(name, owner_id).await?;
        tracing::info!(group_id = group.id, owner_id, "Group created");
        Ok(group)
    }

    async fn invite(
        &self,
        group_id: i64,
        actor_id: i64,
        username: &str,
    ) -> Result<(), GroupError> {
        self.require_member(group_id, actor_id).await?;

        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(GroupError::UserNotFound)?;

        if self.group_repo.is_member(group_id, user.id).await? {
            return Err(GroupError::AlreadyMember);
        }

        self.group_repo.add_member(group_id, user.id).await?;
        tracing::info!(group_id, user_id = user.id, "Member added to group");
        Ok(())
    }

    async fn create_channel(
        &self,
        group_id: i64,
        actor_id: i64,
        name: &str,
    ) -> Result<Channel, GroupError> {
        self.require_member(group_id, actor_id).await?;

        let channel = self.channel_repo.create(group_id, name).await?;
        tracing::info!(group_id, channel_id = channel.id, "Channel created");
        Ok(channel)
    }

    async fn my_groups(&self, user_id: i64) -> Result<Vec<GroupOverview>, GroupError> {
        let groups = self.group_repo.groups_of(user_id).await?;

        let mut overviews = Vec::with_capacity(groups.len());
        for group in groups {
            let members = self.group_repo.members(group.id).await?;
            let channels = self.channel_repo.by_group(group.id).await?;
            overviews.push(GroupOverview {
                group,
                members,
                channels,
            });
        }
        Ok(overviews)
    }
}
