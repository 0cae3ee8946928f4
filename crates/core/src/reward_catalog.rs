//! Point values and badge effects for every rewardable action.

use serde::{Deserialize, Serialize};

use crate::badge_ladder::BadgeKind;

/// Actions that feed the reward engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    QuestCreated,
    /// A correct guess before check-in. Scores nothing so that solving
    /// without visiting cannot be farmed.
    ObjectiveSolved,
    ObjectiveCheckin,
    QuestCompleted,
    TripCreated,
}

pub const POINTS_QUEST_CREATED: i64 = 15;
pub const POINTS_OBJECTIVE_SOLVED: i64 = 0;
pub const POINTS_OBJECTIVE_CHECKIN: i64 = 10;
pub const POINTS_QUEST_COMPLETED: i64 = 25;
pub const POINTS_TRIP_CREATED: i64 = 10;

/// Badge that tracks the running point total rather than an action count.
pub const POINTS_BADGE: BadgeKind = BadgeKind::Overachiever;

/// Progress added to one badge by an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeEffect {
    pub badge: BadgeKind,
    pub increment: i64,
}

/// Catalog row for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardEntry {
    pub points: i64,
    pub effects: &'static [BadgeEffect],
}

const QUESTER_STEP: &[BadgeEffect] = &[BadgeEffect {
    badge: BadgeKind::Quester,
    increment: 1,
}];
const EXPLORER_STEP: &[BadgeEffect] = &[BadgeEffect {
    badge: BadgeKind::Explorer,
    increment: 1,
}];
const CONQUEROR_STEP: &[BadgeEffect] = &[BadgeEffect {
    badge: BadgeKind::Conqueror,
    increment: 1,
}];
const PLANNER_STEP: &[BadgeEffect] = &[BadgeEffect {
    badge: BadgeKind::Planner,
    increment: 1,
}];

impl ActionKind {
    pub fn entry(self) -> RewardEntry {
        match self {
            ActionKind::QuestCreated => RewardEntry {
                points: POINTS_QUEST_CREATED,
                effects: QUESTER_STEP,
            },
            ActionKind::ObjectiveSolved => RewardEntry {
                points: POINTS_OBJECTIVE_SOLVED,
                effects: &[],
            },
            ActionKind::ObjectiveCheckin => RewardEntry {
                points: POINTS_OBJECTIVE_CHECKIN,
                effects: EXPLORER_STEP,
            },
            ActionKind::QuestCompleted => RewardEntry {
                points: POINTS_QUEST_COMPLETED,
                effects: CONQUEROR_STEP,
            },
            ActionKind::TripCreated => RewardEntry {
                points: POINTS_TRIP_CREATED,
                effects: PLANNER_STEP,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::QuestCreated => "quest_created",
            ActionKind::ObjectiveSolved => "objective_solved",
            ActionKind::ObjectiveCheckin => "objective_checkin",
            ActionKind::QuestCompleted => "quest_completed",
            ActionKind::TripCreated => "trip_created",
        }
    }
}
