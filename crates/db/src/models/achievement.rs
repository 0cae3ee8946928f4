//! Achievement tracker and badge progress models.

use std::collections::BTreeMap;

use questline_core::achievement::{AchievementTracker, BadgeProgress};
use questline_core::badge_ladder::BadgeKind;
use questline_core::error::CoreError;
use questline_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `achievement_trackers` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AchievementTrackerRow {
    pub id: DbId,
    pub profile_id: DbId,
    pub points: i64,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `badge_progress` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BadgeProgressRow {
    pub id: DbId,
    pub tracker_id: DbId,
    pub badge: String,
    pub progress: i64,
    pub tier: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AchievementTrackerRow {
    /// Assemble the domain tracker. Unknown badge names are a data fault.
    pub fn into_tracker(
        self,
        badges: Vec<BadgeProgressRow>,
    ) -> Result<AchievementTracker, CoreError> {
        let mut by_kind = BTreeMap::new();
        for row in badges {
            let badge = BadgeKind::from_name(&row.badge).ok_or_else(|| {
                CoreError::Internal(format!("Unknown badge '{}' in badge_progress", row.badge))
            })?;
            by_kind.insert(
                badge,
                BadgeProgress {
                    badge,
                    progress: row.progress,
                    tier: row.tier,
                },
            );
        }
        Ok(AchievementTracker {
            profile_id: self.profile_id,
            points: self.points,
            badges: by_kind,
            version: self.version,
        })
    }
}
