//! Badge definitions and their tier thresholds.
//!
//! Each badge has a strictly increasing list of thresholds. A progress
//! counter sits at tier `n` when exactly `n` thresholds are at or below it,
//! so tier 0 means no threshold has been reached yet.

use serde::{Deserialize, Serialize};

/// Every badge a profile can make progress towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    /// Quests created.
    Quester,
    /// Objectives checked in to.
    Explorer,
    /// Quests completed.
    Conqueror,
    /// Trips created.
    Planner,
    /// Total points earned.
    Overachiever,
}

const QUESTER_THRESHOLDS: &[i64] = &[1, 5, 10];
const EXPLORER_THRESHOLDS: &[i64] = &[1, 10, 25, 50];
const CONQUEROR_THRESHOLDS: &[i64] = &[1, 5, 15];
const PLANNER_THRESHOLDS: &[i64] = &[1, 5, 10];
const OVERACHIEVER_THRESHOLDS: &[i64] = &[100, 500, 1000, 5000];

impl BadgeKind {
    pub const ALL: [BadgeKind; 5] = [
        BadgeKind::Quester,
        BadgeKind::Explorer,
        BadgeKind::Conqueror,
        BadgeKind::Planner,
        BadgeKind::Overachiever,
    ];

    /// Stable name stored in the `badge_progress.badge` column.
    pub fn as_str(self) -> &'static str {
        match self {
            BadgeKind::Quester => "quester",
            BadgeKind::Explorer => "explorer",
            BadgeKind::Conqueror => "conqueror",
            BadgeKind::Planner => "planner",
            BadgeKind::Overachiever => "overachiever",
        }
    }

    pub fn from_name(name: &str) -> Option<BadgeKind> {
        BadgeKind::ALL.into_iter().find(|b| b.as_str() == name)
    }

    pub fn thresholds(self) -> &'static [i64] {
        match self {
            BadgeKind::Quester => QUESTER_THRESHOLDS,
            BadgeKind::Explorer => EXPLORER_THRESHOLDS,
            BadgeKind::Conqueror => CONQUEROR_THRESHOLDS,
            BadgeKind::Planner => PLANNER_THRESHOLDS,
            BadgeKind::Overachiever => OVERACHIEVER_THRESHOLDS,
        }
    }

    pub fn tier_for(self, progress: i64) -> i32 {
        tier_for(self.thresholds(), progress)
    }
}

/// A tier boundary passed by a progress update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierCrossing {
    /// 1-based tier index that was reached.
    pub tier: i32,
    pub threshold: i64,
}

/// Number of thresholds at or below `progress`.
pub fn tier_for(thresholds: &[i64], progress: i64) -> i32 {
    thresholds.iter().take_while(|&&t| t <= progress).count() as i32
}

/// Every tier reached when progress moves from `before` to `after`.
///
/// Returns crossings in ascending tier order. Empty when `after <= before`.
pub fn crossed_tiers(thresholds: &[i64], before: i64, after: i64) -> Vec<TierCrossing> {
    if after <= before {
        return Vec::new();
    }
    thresholds
        .iter()
        .enumerate()
        .filter(|(_, &t)| t > before && t <= after)
        .map(|(i, &t)| TierCrossing {
            tier: i as i32 + 1,
            threshold: t,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_strictly_increasing() {
        for badge in BadgeKind::ALL {
            let t = badge.thresholds();
            assert!(!t.is_empty(), "{badge:?} has no tiers");
            assert!(
                t.windows(2).all(|w| w[0] < w[1]),
                "{badge:?} thresholds not strictly increasing"
            );
        }
    }

    #[test]
    fn tier_zero_below_first_threshold() {
        assert_eq!(tier_for(&[100, 500], 0), 0);
        assert_eq!(tier_for(&[100, 500], 99), 0);
    }

    #[test]
    fn tier_is_greatest_threshold_reached() {
        assert_eq!(tier_for(&[100, 500, 1000], 100), 1);
        assert_eq!(tier_for(&[100, 500, 1000], 750), 2);
        assert_eq!(tier_for(&[100, 500, 1000], 10_000), 3);
    }

    #[test]
    fn single_crossing_reported() {
        let crossed = crossed_tiers(&[1, 10, 25], 9, 10);
        assert_eq!(
            crossed,
            vec![TierCrossing {
                tier: 2,
                threshold: 10
            }]
        );
    }

    #[test]
    fn large_jump_reports_every_crossed_tier() {
        let crossed = crossed_tiers(OVERACHIEVER_THRESHOLDS, 90, 1200);
        let tiers: Vec<i32> = crossed.iter().map(|c| c.tier).collect();
        assert_eq!(tiers, vec![1, 2, 3]);
        assert_eq!(crossed[2].threshold, 1000);
    }

    #[test]
    fn no_crossing_when_staying_within_tier() {
        assert!(crossed_tiers(&[1, 10], 2, 9).is_empty());
        assert!(crossed_tiers(&[1, 10], 5, 5).is_empty());
    }

    #[test]
    fn badge_names_round_trip() {
        for badge in BadgeKind::ALL {
            assert_eq!(BadgeKind::from_name(badge.as_str()), Some(badge));
        }
        assert_eq!(BadgeKind::from_name("unknown"), None);
    }
}
