//! Handlers for quest attempts: start, guess, check in, list.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use questline_core::attempt::QuestAttempt;
use questline_core::error::{CoreError, CHECK_IN_NOT_ALLOWED};
use questline_core::service::{CheckInOutcome, GuessOutcome};
use questline_core::types::DbId;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for starting an attempt. `profile_id` defaults to the caller.
#[derive(Debug, Deserialize)]
pub struct AttemptTarget {
    pub profile_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct AttemptListParams {
    #[serde(default)]
    pub completed: bool,
}

/// POST /api/v1/quests/{quest_id}/attempts
pub async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(quest_id): Path<DbId>,
    Query(target): Query<AttemptTarget>,
) -> AppResult<(StatusCode, Json<DataResponse<QuestAttempt>>)> {
    let profile_id = target.profile_id.unwrap_or(caller.profile_id);
    let attempt = state
        .quests
        .create_attempt(caller.profile_id, quest_id, profile_id)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: attempt })))
}

/// POST /api/v1/attempts/{attempt_id}/guess/{destination_id}
///
/// A wrong guess is a normal outcome: 200 with `correct: false`.
pub async fn guess(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((attempt_id, destination_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<GuessOutcome>>> {
    let outcome = state
        .quests
        .solve_current(caller.profile_id, attempt_id, destination_id)
        .await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/attempts/{attempt_id}/check-in
pub async fn check_in(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(attempt_id): Path<DbId>,
) -> AppResult<Json<DataResponse<CheckInOutcome>>> {
    let outcome = state.quests.check_in(caller.profile_id, attempt_id).await?;
    if !outcome.admitted {
        return Err(AppError::Core(CoreError::Forbidden(
            CHECK_IN_NOT_ALLOWED.into(),
        )));
    }
    Ok(Json(DataResponse { data: outcome }))
}

/// GET /api/v1/profiles/{profile_id}/attempts?completed=
pub async fn list_by_profile(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(profile_id): Path<DbId>,
    Query(params): Query<AttemptListParams>,
) -> AppResult<Json<DataResponse<Vec<QuestAttempt>>>> {
    let attempts = state
        .quests
        .list_attempts(caller.profile_id, profile_id, params.completed)
        .await?;
    Ok(Json(DataResponse { data: attempts }))
}
