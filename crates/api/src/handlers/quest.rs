//! Handlers for the `/quests` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use questline_core::achievement::RewardResult;
use questline_core::quest::{NewQuest, Quest, QuestEdit};
use questline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for creating a quest. `owner_id` defaults to the caller.
#[derive(Debug, Deserialize)]
pub struct CreateQuestRequest {
    pub owner_id: Option<DbId>,
    pub title: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    #[serde(default)]
    pub destinations: Vec<DbId>,
}

#[derive(Debug, Serialize)]
pub struct CreatedQuest {
    pub quest: Quest,
    pub reward: RewardResult,
}

/// POST /api/v1/quests
pub async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(input): Json<CreateQuestRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedQuest>>)> {
    let new_quest = NewQuest {
        owner_id: input.owner_id.unwrap_or(caller.profile_id),
        title: input.title,
        start_date: input.start_date,
        end_date: input.end_date,
        destinations: input.destinations,
    };
    let (quest, reward) = state
        .quests
        .create_quest(caller.profile_id, new_quest)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedQuest { quest, reward },
        }),
    ))
}

/// PUT /api/v1/quests/{quest_id}
pub async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(quest_id): Path<DbId>,
    Json(edit): Json<QuestEdit>,
) -> AppResult<Json<DataResponse<Quest>>> {
    let quest = state
        .quests
        .edit_quest(caller.profile_id, quest_id, edit)
        .await?;
    Ok(Json(DataResponse { data: quest }))
}

/// DELETE /api/v1/quests/{quest_id}
pub async fn delete(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(quest_id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.quests.delete_quest(caller.profile_id, quest_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/quests/{quest_id}/active-profiles
pub async fn active_profiles(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(quest_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<DbId>>>> {
    let profiles = state.quests.active_profiles(quest_id).await?;
    Ok(Json(DataResponse { data: profiles }))
}
