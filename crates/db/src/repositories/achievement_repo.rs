//! Repository for the `achievement_trackers` and `badge_progress` tables.

use questline_core::achievement::AchievementTracker;
use questline_core::types::DbId;
use sqlx::PgPool;

use crate::models::achievement::{AchievementTrackerRow, BadgeProgressRow};

/// Column list for achievement_trackers queries.
const COLUMNS: &str = "id, profile_id, points, version, created_at, updated_at";

/// Column list for badge_progress queries.
const BADGE_COLUMNS: &str = "id, tracker_id, badge, progress, tier, created_at, updated_at";

pub struct AchievementRepo;

impl AchievementRepo {
    pub async fn find_by_profile(
        pool: &PgPool,
        profile_id: DbId,
    ) -> Result<Option<(AchievementTrackerRow, Vec<BadgeProgressRow>)>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM achievement_trackers WHERE profile_id = $1");
        let Some(tracker) = sqlx::query_as::<_, AchievementTrackerRow>(&query)
            .bind(profile_id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let query = format!(
            "SELECT {BADGE_COLUMNS} FROM badge_progress WHERE tracker_id = $1 ORDER BY badge"
        );
        let badges = sqlx::query_as::<_, BadgeProgressRow>(&query)
            .bind(tracker.id)
            .fetch_all(pool)
            .await?;
        Ok(Some((tracker, badges)))
    }

    /// Write points and every badge back if the tracker still has `tracker.version`.
    ///
    /// Returns `None` when the version check fails; nothing is written then.
    pub async fn update_versioned(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tracker: &AchievementTracker,
    ) -> Result<Option<(AchievementTrackerRow, Vec<BadgeProgressRow>)>, sqlx::Error> {
        let query = format!(
            "UPDATE achievement_trackers SET
                points = $3,
                version = version + 1
             WHERE profile_id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        let Some(row) = sqlx::query_as::<_, AchievementTrackerRow>(&query)
            .bind(tracker.profile_id)
            .bind(tracker.version)
            .bind(tracker.points)
            .fetch_optional(&mut **tx)
            .await?
        else {
            return Ok(None);
        };

        let upsert = format!(
            "INSERT INTO badge_progress (tracker_id, badge, progress, tier)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_badge_progress_tracker_badge
             DO UPDATE SET progress = EXCLUDED.progress, tier = EXCLUDED.tier
             RETURNING {BADGE_COLUMNS}"
        );
        let mut badges = Vec::with_capacity(tracker.badges.len());
        for progress in tracker.badges.values() {
            let badge = sqlx::query_as::<_, BadgeProgressRow>(&upsert)
                .bind(row.id)
                .bind(progress.badge.as_str())
                .bind(progress.progress)
                .bind(progress.tier)
                .fetch_one(&mut **tx)
                .await?;
            badges.push(badge);
        }
        Ok(Some((row, badges)))
    }
}
