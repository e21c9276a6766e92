//! Error response mapping tests

use axum::http::StatusCode;
use axum::response::IntoResponse;

use parley::shared::error::AppError;

#[test]
fn test_not_found_maps_to_404() {
    let response = AppError::NotFound("User not found".into()).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_unauthorized_maps_to_401() {
    let response = AppError::Unauthorized("Invalid token".into()).into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_forbidden_maps_to_403() {
    let response = AppError::Forbidden("Not a member".into()).into_response();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[test]
fn test_conflict_maps_to_409() {
    let response = AppError::Conflict("Username already taken".into()).into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[test]
fn test_validation_maps_to_400() {
    let response = AppError::Validation("username: too short".into()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_internal_details_are_not_leaked() {
    let response = AppError::Internal("pool exhausted at 10.0.0.3".into()).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
