//! Handlers for profile achievements and direct rewards.

use axum::extract::{Path, State};
use axum::Json;
use questline_core::achievement::{AchievementTracker, RewardResult};
use questline_core::reward_catalog::ActionKind;
use questline_core::service::RewardSubject;
use questline_core::types::DbId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GrantRewardRequest {
    pub action: ActionKind,
    pub subject: Option<RewardSubject>,
}

/// GET /api/v1/profiles/{profile_id}/achievements
pub async fn achievements(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(profile_id): Path<DbId>,
) -> AppResult<Json<DataResponse<AchievementTracker>>> {
    let tracker = state
        .quests
        .achievements(caller.profile_id, profile_id)
        .await?;
    Ok(Json(DataResponse { data: tracker }))
}

/// POST /api/v1/profiles/{profile_id}/rewards
pub async fn grant_reward(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(profile_id): Path<DbId>,
    Json(input): Json<GrantRewardRequest>,
) -> AppResult<Json<DataResponse<RewardResult>>> {
    let admin = state.quests.require_admin(caller.profile_id).await?;
    let result = state
        .quests
        .reward_action(profile_id, input.action, input.subject)
        .await?;

    tracing::info!(
        admin_id = admin.id,
        profile_id,
        action = input.action.as_str(),
        "Reward granted by admin",
    );
    Ok(Json(DataResponse { data: result }))
}
