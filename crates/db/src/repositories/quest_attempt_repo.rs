//! Repository for the `quest_attempts` table.

use questline_core::attempt::{NewAttempt, QuestAttempt};
use questline_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::quest_attempt::QuestAttemptRow;

/// Column list for quest_attempts queries.
const COLUMNS: &str =
    "id, quest_id, profile_id, progress, solved_current, completed, version, created_at, updated_at";

/// Same columns qualified with the `a` alias for joins.
const JOINED_COLUMNS: &str = "a.id, a.quest_id, a.profile_id, a.progress, a.solved_current, \
     a.completed, a.version, a.created_at, a.updated_at";

pub struct QuestAttemptRepo;

impl QuestAttemptRepo {
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<QuestAttemptRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quest_attempts WHERE id = $1");
        sqlx::query_as::<_, QuestAttemptRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, profile_id: DbId, quest_id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM quest_attempts WHERE profile_id = $1 AND quest_id = $2)",
        )
        .bind(profile_id)
        .bind(quest_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Insert an attempt. A duplicate (profile, quest) pair fails on
    /// `uq_quest_attempts_profile_quest`.
    pub async fn create(pool: &PgPool, input: &NewAttempt) -> Result<QuestAttemptRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO quest_attempts (quest_id, profile_id, completed)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuestAttemptRow>(&query)
            .bind(input.quest_id)
            .bind(input.profile_id)
            .bind(input.completed)
            .fetch_one(pool)
            .await
    }

    /// Profiles with an uncompleted attempt on a quest available at `now`.
    pub async fn active_profile_ids(
        pool: &PgPool,
        quest_id: DbId,
        now: Timestamp,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT a.profile_id
             FROM quest_attempts a
             JOIN quests q ON q.id = a.quest_id
             WHERE a.quest_id = $1
               AND NOT a.completed
               AND q.start_date <= $2 AND $2 < q.end_date
             ORDER BY a.profile_id",
        )
        .bind(quest_id)
        .bind(now)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// A profile's attempts on quests available at `now`, newest first.
    pub async fn list_for_profile(
        pool: &PgPool,
        profile_id: DbId,
        now: Timestamp,
        completed: bool,
    ) -> Result<Vec<QuestAttemptRow>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM quest_attempts a
             JOIN quests q ON q.id = a.quest_id
             WHERE a.profile_id = $1
               AND a.completed = $3
               AND q.start_date <= $2 AND $2 < q.end_date
             ORDER BY a.created_at DESC, a.id DESC"
        );
        sqlx::query_as::<_, QuestAttemptRow>(&query)
            .bind(profile_id)
            .bind(now)
            .bind(completed)
            .fetch_all(pool)
            .await
    }

    /// Write `attempt` back if the stored row still has `attempt.version`.
    ///
    /// Returns `None` when the version check fails.
    pub async fn update_versioned(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        attempt: &QuestAttempt,
    ) -> Result<Option<QuestAttemptRow>, sqlx::Error> {
        let query = format!(
            "UPDATE quest_attempts SET
                progress = $3,
                solved_current = $4,
                completed = $5,
                version = version + 1
             WHERE id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuestAttemptRow>(&query)
            .bind(attempt.id)
            .bind(attempt.version)
            .bind(attempt.progress)
            .bind(attempt.solved_current)
            .bind(attempt.completed)
            .fetch_optional(&mut **tx)
            .await
    }
}
