//! Route definitions for the `/quests` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{attempt, quest};
use crate::state::AppState;

/// Routes mounted at `/quests`.
///
/// ```text
/// POST   /                                  -> create
/// PUT    /{quest_id}                        -> update
/// DELETE /{quest_id}                        -> delete
/// GET    /{quest_id}/active-profiles        -> active_profiles
/// POST   /{quest_id}/attempts               -> attempt::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(quest::create))
        .route("/{quest_id}", put(quest::update).delete(quest::delete))
        .route("/{quest_id}/active-profiles", get(quest::active_profiles))
        .route("/{quest_id}/attempts", post(attempt::create))
}
