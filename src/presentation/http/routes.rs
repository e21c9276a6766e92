//! Route Configuration
//!
//! Configures all HTTP routes and the WebSocket gateway endpoint.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
    Router,
};
use tower_http::services::ServeDir;

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::auth_middleware;
use crate::presentation::realtime::ws_handler;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let uploads_dir = state.settings.uploads.dir.clone();

    Router::new()
        .nest("/api", api_routes(state.clone()))
        // WebSocket gateway endpoint
        .route("/gateway", get(ws_handler))
        // Uploaded files are served statically
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API routes
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Public routes
        .nest("/auth", auth_routes())
        // Protected routes (require authentication)
        .nest("/users", user_routes(state.clone()))
        .nest("/friends", friend_routes(state.clone()))
        .nest("/groups", group_routes(state.clone()))
        .nest("/messages", message_routes(state.clone()))
        .nest("/uploads", upload_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
}

/// User routes (protected)
fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/@me", get(handlers::user::get_current_user))
        .route("/@me", patch(handlers::user::update_current_user))
        .route("/{user_id}", get(handlers::user::get_user))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Friend routes (protected)
fn friend_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::friend::list_friends))
        .route("/", post(handlers::friend::add_friend))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Group routes (protected)
fn group_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::group::create_group))
        .route("/", get(handlers::group::my_groups))
        .route("/{group_id}/invites", post(handlers::group::invite))
        .route("/{group_id}/channels", post(handlers::group::create_channel))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Message routes (protected)
fn message_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::message::send_message))
        .route("/", get(handlers::message::get_history))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Upload routes (protected, with a raised body limit)
fn upload_routes(state: AppState) -> Router<AppState> {
    // Allow some slack over the per-file limit for multipart framing
    let body_limit = state.settings.uploads.max_file_size + 1024 * 1024;

    Router::new()
        .route("/", post(handlers::upload::upload_files))
        .layer(DefaultBodyLimit::max(body_limit))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
