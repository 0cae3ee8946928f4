use questline_core::attempt::QuestAttempt;
use questline_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `quest_attempts` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QuestAttemptRow {
    pub id: DbId,
    pub quest_id: DbId,
    pub profile_id: DbId,
    pub progress: i32,
    pub solved_current: bool,
    pub completed: bool,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<QuestAttemptRow> for QuestAttempt {
    fn from(row: QuestAttemptRow) -> Self {
        QuestAttempt {
            id: row.id,
            quest_id: row.quest_id,
            profile_id: row.profile_id,
            progress: row.progress,
            solved_current: row.solved_current,
            completed: row.completed,
            version: row.version,
            created_at: row.created_at,
        }
    }
}
