//! Repository for the `profiles` table.

use questline_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::{CreateProfile, ProfileRow};

/// Column list for profiles queries.
const COLUMNS: &str = "id, username, is_admin, created_at, updated_at";

pub struct ProfileRepo;

impl ProfileRepo {
    /// Create a profile and its empty achievement tracker in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateProfile) -> Result<ProfileRow, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO profiles (username, is_admin)
             VALUES ($1, COALESCE($2, false))
             RETURNING {COLUMNS}"
        );
        let profile = sqlx::query_as::<_, ProfileRow>(&query)
            .bind(&input.username)
            .bind(input.is_admin)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO achievement_trackers (profile_id) VALUES ($1)")
            .bind(profile.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(profile)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProfileRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, ProfileRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a profile. Attempts and tracker cascade; owned quests block it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
