//! Repository for the `quests` and `objectives` tables.
//!
//! Objectives are always written as a full ordered list: creating or editing
//! a quest replaces every objective row in the same transaction.

use questline_core::quest::{NewQuest, Quest, QuestEdit};
use questline_core::types::DbId;
use sqlx::PgPool;

use crate::models::quest::{ObjectiveRow, QuestRow};

/// Column list for quests queries.
const COLUMNS: &str = "id, owner_id, title, start_date, end_date, created_at, updated_at";

/// Column list for objectives queries.
const OBJECTIVE_COLUMNS: &str =
    "id, quest_id, owner_id, destination_id, position, created_at, updated_at";

pub struct QuestRepo;

impl QuestRepo {
    /// Load a quest with its objectives ordered by position.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Quest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quests WHERE id = $1");
        let Some(row) = sqlx::query_as::<_, QuestRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let objectives = Self::list_objectives(pool, id).await?;
        Ok(Some(row.into_quest(objectives)))
    }

    pub async fn list_objectives(
        pool: &PgPool,
        quest_id: DbId,
    ) -> Result<Vec<ObjectiveRow>, sqlx::Error> {
        let query = format!(
            "SELECT {OBJECTIVE_COLUMNS} FROM objectives WHERE quest_id = $1 ORDER BY position ASC"
        );
        sqlx::query_as::<_, ObjectiveRow>(&query)
            .bind(quest_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a quest and its objectives inside the caller's transaction.
    pub async fn create(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &NewQuest,
    ) -> Result<Quest, sqlx::Error> {
        let query = format!(
            "INSERT INTO quests (owner_id, title, start_date, end_date)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, QuestRow>(&query)
            .bind(input.owner_id)
            .bind(&input.title)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(&mut **tx)
            .await?;

        let objectives =
            Self::set_objectives_inner(tx, row.id, row.owner_id, &input.destinations).await?;
        Ok(row.into_quest(objectives))
    }

    /// Replace a quest's definition and bring its open attempts in line.
    ///
    /// Attempts the new list no longer reaches are completed. Attempts whose
    /// pending objective now has a different destination must guess again.
    /// Returns `None` if the quest does not exist.
    pub async fn replace(
        pool: &PgPool,
        id: DbId,
        edit: &QuestEdit,
    ) -> Result<Option<Quest>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE quests SET title = $2, start_date = $3, end_date = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(row) = sqlx::query_as::<_, QuestRow>(&query)
            .bind(id)
            .bind(&edit.title)
            .bind(edit.start_date)
            .bind(edit.end_date)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        // Runs against the old objective rows, before they are replaced.
        let count = edit.destinations.len() as i32;
        let unsolved = sqlx::query(
            "UPDATE quest_attempts a SET
                solved_current = false,
                version = a.version + 1
             WHERE a.quest_id = $1 AND NOT a.completed AND a.solved_current
               AND a.progress < $2
               AND (SELECT o.destination_id FROM objectives o
                    WHERE o.quest_id = a.quest_id AND o.position = a.progress)
                   IS DISTINCT FROM ($3::BIGINT[])[a.progress + 1]",
        )
        .bind(id)
        .bind(count)
        .bind(edit.destinations.as_slice())
        .execute(&mut *tx)
        .await?;

        let objectives =
            Self::set_objectives_inner(&mut tx, row.id, row.owner_id, &edit.destinations).await?;

        let settled = sqlx::query(
            "UPDATE quest_attempts SET
                progress = LEAST(progress, $2),
                solved_current = false,
                completed = true,
                version = version + 1
             WHERE quest_id = $1 AND NOT completed AND progress >= $2",
        )
        .bind(id)
        .bind(count)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        if unsolved.rows_affected() > 0 {
            tracing::info!(
                quest_id = id,
                unsolved = unsolved.rows_affected(),
                "Solved objectives reset by quest edit",
            );
        }
        if settled.rows_affected() > 0 {
            tracing::info!(
                quest_id = id,
                settled = settled.rows_affected(),
                "Attempts completed by quest edit",
            );
        }
        Ok(Some(row.into_quest(objectives)))
    }

    /// Delete a quest. Objectives and attempts cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quests WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_objectives_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        quest_id: DbId,
        owner_id: DbId,
        destinations: &[DbId],
    ) -> Result<Vec<ObjectiveRow>, sqlx::Error> {
        sqlx::query("DELETE FROM objectives WHERE quest_id = $1")
            .bind(quest_id)
            .execute(&mut **tx)
            .await?;

        let query = format!(
            "INSERT INTO objectives (quest_id, owner_id, destination_id, position)
             VALUES ($1, $2, $3, $4)
             RETURNING {OBJECTIVE_COLUMNS}"
        );
        let mut objectives = Vec::with_capacity(destinations.len());
        for (position, &destination_id) in destinations.iter().enumerate() {
            let row = sqlx::query_as::<_, ObjectiveRow>(&query)
                .bind(quest_id)
                .bind(owner_id)
                .bind(destination_id)
                .bind(position as i32)
                .fetch_one(&mut **tx)
                .await?;
            objectives.push(row);
        }
        Ok(objectives)
    }
}
