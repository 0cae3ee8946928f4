//! Achievement tracking and the reward engine.
//!
//! [`reward`] is the only place that mutates an [`AchievementTracker`]. It
//! looks the action up in the reward catalog, adds the point delta, advances
//! badge progress and reports every tier threshold crossed on the way.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::badge_ladder::{crossed_tiers, BadgeKind};
use crate::reward_catalog::{ActionKind, POINTS_BADGE};
use crate::types::DbId;

/// Progress towards a single badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BadgeProgress {
    pub badge: BadgeKind,
    pub progress: i64,
    pub tier: i32,
}

impl BadgeProgress {
    pub fn empty(badge: BadgeKind) -> Self {
        Self {
            badge,
            progress: 0,
            tier: 0,
        }
    }
}

/// Points and badge progress owned one-to-one by a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementTracker {
    pub profile_id: DbId,
    pub points: i64,
    pub badges: BTreeMap<BadgeKind, BadgeProgress>,
    /// Optimistic concurrency version, bumped on every persisted change.
    pub version: i32,
}

impl AchievementTracker {
    pub fn new(profile_id: DbId) -> Self {
        Self {
            profile_id,
            points: 0,
            badges: BTreeMap::new(),
            version: 0,
        }
    }

    /// Progress for `badge`, zero if the profile never advanced it.
    pub fn badge(&self, badge: BadgeKind) -> BadgeProgress {
        self.badges
            .get(&badge)
            .copied()
            .unwrap_or_else(|| BadgeProgress::empty(badge))
    }

    fn advance(&mut self, badge: BadgeKind, increment: i64, crossed: &mut Vec<BadgeAchievement>) {
        let entry = self
            .badges
            .entry(badge)
            .or_insert_with(|| BadgeProgress::empty(badge));
        let before = entry.progress;
        entry.progress += increment;
        entry.tier = badge.tier_for(entry.progress);

        crossed.extend(
            crossed_tiers(badge.thresholds(), before, entry.progress)
                .into_iter()
                .map(|c| BadgeAchievement {
                    badge,
                    tier: c.tier,
                    threshold: c.threshold,
                    progress: entry.progress,
                }),
        );
    }
}

/// Points granted for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PointsAward {
    pub action: ActionKind,
    pub points: i64,
}

/// A badge tier reached by a reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BadgeAchievement {
    pub badge: BadgeKind,
    pub tier: i32,
    pub threshold: i64,
    /// Badge progress after the update that crossed this tier.
    pub progress: i64,
}

/// Everything a profile earned from one or more actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewardResult {
    pub points_awarded: Vec<PointsAward>,
    pub badges_achieved: Vec<BadgeAchievement>,
}

impl RewardResult {
    pub fn total_points(&self) -> i64 {
        self.points_awarded.iter().map(|p| p.points).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.points_awarded.is_empty() && self.badges_achieved.is_empty()
    }

    pub fn merge(&mut self, other: RewardResult) {
        self.points_awarded.extend(other.points_awarded);
        self.badges_achieved.extend(other.badges_achieved);
    }
}

/// Apply one action to `tracker`.
pub fn reward(tracker: &mut AchievementTracker, action: ActionKind) -> RewardResult {
    let entry = action.entry();
    let mut result = RewardResult::default();

    if entry.points != 0 {
        tracker.points += entry.points;
        result.points_awarded.push(PointsAward {
            action,
            points: entry.points,
        });
    }

    for effect in entry.effects {
        tracker.advance(effect.badge, effect.increment, &mut result.badges_achieved);
    }

    if entry.points > 0 {
        tracker.advance(POINTS_BADGE, entry.points, &mut result.badges_achieved);
    }

    result
}

/// Apply `actions` in order, collecting one combined result.
pub fn reward_all(
    tracker: &mut AchievementTracker,
    actions: impl IntoIterator<Item = ActionKind>,
) -> RewardResult {
    let mut result = RewardResult::default();
    for action in actions {
        result.merge(reward(tracker, action));
    }
    result
}

/// Reward a correct guess. Currently worth nothing; see [`ActionKind::ObjectiveSolved`].
pub fn reward_objective_solved(tracker: &mut AchievementTracker) -> RewardResult {
    reward(tracker, ActionKind::ObjectiveSolved)
}

/// Reward a quest-level action (creation, completion).
pub fn reward_quest_interaction(
    tracker: &mut AchievementTracker,
    action: ActionKind,
) -> RewardResult {
    reward(tracker, action)
}
