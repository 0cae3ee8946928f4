//! Route definitions for the `/profiles` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{attempt, profile};
use crate::state::AppState;

/// Routes mounted at `/profiles`.
///
/// ```text
/// GET    /{profile_id}/attempts          -> attempt::list_by_profile
/// GET    /{profile_id}/achievements      -> achievements
/// POST   /{profile_id}/rewards           -> grant_reward (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{profile_id}/attempts", get(attempt::list_by_profile))
        .route("/{profile_id}/achievements", get(profile::achievements))
        .route("/{profile_id}/rewards", post(profile::grant_reward))
}
