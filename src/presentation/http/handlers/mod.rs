//! HTTP Request Handlers

pub mod auth;
pub mod friend;
pub mod group;
pub mod health;
pub mod message;
pub mod upload;
pub mod user;
