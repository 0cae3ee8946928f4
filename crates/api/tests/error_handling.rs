//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use questline_api::error::AppError;
use questline_core::error::{
    CoreError, ENTITY_ATTEMPT, QUEST_ATTEMPT_EXISTS, QUEST_CANNOT_BE_EDITED,
    ROW_CHANGED_CONCURRENTLY, START_OWN_QUEST,
};

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: ENTITY_ATTEMPT,
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "QuestAttempt with id 42 not found");
    assert_eq!(json["retryable"], false);
}

#[tokio::test]
async fn duplicate_attempt_returns_retryable_409() {
    let err = AppError::Core(CoreError::Conflict(QUEST_ATTEMPT_EXISTS.into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], QUEST_ATTEMPT_EXISTS);
    assert_eq!(json["retryable"], true);
}

#[tokio::test]
async fn concurrent_modification_returns_retryable_409() {
    let err = AppError::Core(CoreError::ConcurrentModification(
        ROW_CHANGED_CONCURRENTLY.into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONCURRENT_MODIFICATION");
    assert_eq!(json["retryable"], true);
}

#[tokio::test]
async fn forbidden_error_returns_403() {
    let err = AppError::Core(CoreError::Forbidden(START_OWN_QUEST.into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
    assert_eq!(json["error"], START_OWN_QUEST);
}

#[tokio::test]
async fn edit_lock_violation_returns_400() {
    let err = AppError::Core(CoreError::InvariantViolation(QUEST_CANNOT_BE_EDITED.into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVARIANT_VIOLATION");
    assert_eq!(json["retryable"], false);
}

#[tokio::test]
async fn unauthorized_error_returns_401() {
    let err = AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn internal_error_hides_details() {
    let err = AppError::Core(CoreError::Internal("tracker missing for profile 9".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("Quest title must not be empty".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Quest title must not be empty");
    assert_eq!(json["retryable"], false);
}
