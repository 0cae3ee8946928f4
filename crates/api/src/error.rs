use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use questline_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Every failure reaching a handler is already a [`CoreError`]; database
/// errors are translated by `questline_db::store::map_db_error`.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `questline_core`.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl AppError {
    /// Whether the client may resend the same request.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Core(core) => core.is_retryable(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::ConcurrentModification(msg) => (
                    StatusCode::CONFLICT,
                    "CONCURRENT_MODIFICATION",
                    msg.clone(),
                ),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::InvariantViolation(msg) => {
                    (StatusCode::BAD_REQUEST, "INVARIANT_VIOLATION", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },
        };

        let body = json!({
            "error": message,
            "code": code,
            "retryable": self.is_retryable(),
        });

        (status, axum::Json(body)).into_response()
    }
}
