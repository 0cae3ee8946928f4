pub mod attempt;
pub mod health;
pub mod profile;
pub mod quest;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree. Every route requires a Bearer token.
///
/// ```text
/// /quests                                          create
/// /quests/{quest_id}                               edit, delete
/// /quests/{quest_id}/active-profiles               profiles mid-attempt
/// /quests/{quest_id}/attempts                      start an attempt
///
/// /attempts/{attempt_id}/guess/{destination_id}    guess the pending objective
/// /attempts/{attempt_id}/check-in                  check in to a solved objective
///
/// /profiles/{profile_id}/attempts                  attempts (?completed=)
/// /profiles/{profile_id}/achievements              points and badges
/// /profiles/{profile_id}/rewards                   grant a reward (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/quests", quest::router())
        .nest("/attempts", attempt::router())
        .nest("/profiles", profile::router())
}
