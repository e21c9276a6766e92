//! Upload Handlers
//!
//! Multipart file uploads. Files land in the configured uploads directory
//! under a random-prefixed, sanitized name and are served back statically;
//! the returned descriptor can be placed verbatim in a message's
//! `attachments`.

use axum::{
    extract::{Extension, Multipart, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::application::dto::response::UploadResponse;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::sanitize_filename;
use crate::startup::AppState;

/// Accept one or more files from a multipart form
pub async fn upload_files(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Vec<UploadResponse>>), AppError> {
    let max_size = state.settings.uploads.max_file_size;
    let dir = state.settings.uploads.dir.clone();

    let mut uploaded = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let original = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "file".to_string());
        let mimetype = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;

        if bytes.len() > max_size {
            return Err(AppError::BadRequest("File too large".into()));
        }

        let stored_name = format!("{}__{}", Uuid::new_v4(), sanitize_filename(&original));
        let path = std::path::Path::new(&dir).join(&stored_name);

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store upload: {}", e)))?;

        tracing::info!(
            user_id = auth.user_id,
            file = %stored_name,
            size = bytes.len(),
            "File uploaded"
        );

        uploaded.push(UploadResponse {
            url: format!("/uploads/{}", stored_name),
            original,
            mimetype,
            size: bytes.len() as i64,
        });
    }

    if uploaded.is_empty() {
        return Err(AppError::BadRequest("No files in request".into()));
    }

    Ok((StatusCode::CREATED, Json(uploaded)))
}
