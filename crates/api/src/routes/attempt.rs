//! Route definitions for the `/attempts` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::attempt;
use crate::state::AppState;

/// Routes mounted at `/attempts`.
///
/// ```text
/// POST   /{attempt_id}/guess/{destination_id}   -> guess
/// POST   /{attempt_id}/check-in                 -> check_in
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{attempt_id}/guess/{destination_id}",
            post(attempt::guess),
        )
        .route("/{attempt_id}/check-in", post(attempt::check_in))
}
