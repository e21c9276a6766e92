//! Response DTOs
//!
//! Data structures for API response bodies.

use serde::Serialize;

use crate::application::services::{AuthToken, GroupOverview};
use crate::domain::{Channel, Group, Profile, User};

/// Authentication token response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl From<AuthToken> for TokenResponse {
    fn from(token: AuthToken) -> Self {
        Self {
            access_token: token.access_token,
            expires_in: token.expires_in,
            token_type: token.token_type,
        }
    }
}

/// Registration/login response (user plus token)
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl AuthResponse {
    pub fn new(user: User, token: AuthToken) -> Self {
        Self {
            user: UserResponse::from(user),
            access_token: token.access_token,
            expires_in: token.expires_in,
            token_type: token.token_type,
        }
    }
}

/// User response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            avatar_url: user.avatar_url,
            bio: user.bio,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Group response
#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub created_at: String,
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            name: group.name,
            owner_id: group.owner_id,
            created_at: group.created_at.to_rfc3339(),
        }
    }
}

/// Channel response
#[derive(Debug, Serialize)]
pub struct ChannelResponse {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    pub created_at: String,
}

impl From<Channel> for ChannelResponse {
    fn from(channel: Channel) -> Self {
        Self {
            id: channel.id,
            group_id: channel.group_id,
            name: channel.name,
            created_at: channel.created_at.to_rfc3339(),
        }
    }
}

/// Group with members and channels, for the sidebar listing
#[derive(Debug, Serialize)]
pub struct GroupOverviewResponse {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub created_at: String,
    pub members: Vec<Profile>,
    pub channels: Vec<ChannelResponse>,
}

impl From<GroupOverview> for GroupOverviewResponse {
    fn from(overview: GroupOverview) -> Self {
        Self {
            id: overview.group.id,
            name: overview.group.name,
            owner_id: overview.group.owner_id,
            created_at: overview.group.created_at.to_rfc3339(),
            members: overview.members,
            channels: overview
                .channels
                .into_iter()
                .map(ChannelResponse::from)
                .collect(),
        }
    }
}

/// Uploaded file descriptor, suitable for a message's `attachments` entry
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub original: String,
    pub mimetype: String,
    pub size: i64,
}
