//! Quest and objective models.

use questline_core::quest::{Objective, Quest};
use questline_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `quests` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QuestRow {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `objectives` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ObjectiveRow {
    pub id: DbId,
    pub quest_id: DbId,
    pub owner_id: DbId,
    pub destination_id: DbId,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ObjectiveRow> for Objective {
    fn from(row: ObjectiveRow) -> Self {
        Objective {
            id: row.id,
            quest_id: row.quest_id,
            owner_id: row.owner_id,
            destination_id: row.destination_id,
            position: row.position,
        }
    }
}

impl QuestRow {
    /// Assemble the domain quest. `objectives` must be ordered by position.
    pub fn into_quest(self, objectives: Vec<ObjectiveRow>) -> Quest {
        Quest {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            start_date: self.start_date,
            end_date: self.end_date,
            objectives: objectives.into_iter().map(Objective::from).collect(),
        }
    }
}
