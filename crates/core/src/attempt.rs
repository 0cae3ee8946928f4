//! Quest attempt state machine.
//!
//! An attempt moves `NotStarted -> Active(cursor) -> Completed`. The cursor
//! counts objectives that were both solved and checked in, and is also the
//! index of the pending objective. Operations never touch rewards directly:
//! they return the [`AttemptEvent`]s they triggered and the caller feeds those
//! to the reward engine in one place.

use serde::Serialize;

use crate::guess::is_correct_guess;
use crate::quest::Quest;
use crate::reward_catalog::ActionKind;
use crate::sequencer::{current_to_check_in, current_to_solve};
use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestAttempt {
    pub id: DbId,
    pub quest_id: DbId,
    pub profile_id: DbId,
    /// Objectives fully completed; index of the pending objective.
    pub progress: i32,
    /// Whether the objective at `progress` has been guessed correctly.
    pub solved_current: bool,
    pub completed: bool,
    /// Optimistic concurrency version, bumped on every persisted change.
    pub version: i32,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AttemptState {
    NotStarted,
    Active { cursor: i32 },
    Completed,
}

impl AttemptState {
    pub fn of(attempt: Option<&QuestAttempt>) -> AttemptState {
        match attempt {
            None => AttemptState::NotStarted,
            Some(a) if a.completed => AttemptState::Completed,
            Some(a) => AttemptState::Active { cursor: a.progress },
        }
    }
}

/// Something that happened to an attempt and may be worth a reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AttemptEvent {
    ObjectiveSolved { objective_id: DbId },
    ObjectiveCheckedIn { objective_id: DbId },
    QuestCompleted { quest_id: DbId },
}

impl AttemptEvent {
    pub fn action(self) -> ActionKind {
        match self {
            AttemptEvent::ObjectiveSolved { .. } => ActionKind::ObjectiveSolved,
            AttemptEvent::ObjectiveCheckedIn { .. } => ActionKind::ObjectiveCheckin,
            AttemptEvent::QuestCompleted { .. } => ActionKind::QuestCompleted,
        }
    }
}

/// Outcome of a guess or check-in.
///
/// `accepted == false` is a normal game outcome (wrong guess, check-in
/// before solving) and leaves the attempt untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub accepted: bool,
    pub events: Vec<AttemptEvent>,
}

impl Transition {
    fn rejected() -> Self {
        Self {
            accepted: false,
            events: Vec::new(),
        }
    }

    pub fn actions(&self) -> impl Iterator<Item = ActionKind> + '_ {
        self.events.iter().map(|e| e.action())
    }
}

/// Values for a freshly created attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewAttempt {
    pub quest_id: DbId,
    pub profile_id: DbId,
    /// A quest without objectives is completed the moment it is attempted.
    pub completed: bool,
}

impl NewAttempt {
    pub fn for_quest(quest: &Quest, profile_id: DbId) -> Self {
        Self {
            quest_id: quest.id,
            profile_id,
            completed: quest.objectives.is_empty(),
        }
    }
}

impl QuestAttempt {
    pub fn state(&self) -> AttemptState {
        AttemptState::of(Some(self))
    }

    /// Guess the destination of the pending objective.
    ///
    /// A correct guess marks the objective solved but does not advance the
    /// cursor. Wrong guesses change nothing and may be repeated freely.
    pub fn solve_current(&mut self, quest: &Quest, guessed_destination_id: DbId) -> Transition {
        let Some(objective) = current_to_solve(quest, self) else {
            return Transition::rejected();
        };
        if !is_correct_guess(objective, guessed_destination_id) {
            return Transition::rejected();
        }

        self.solved_current = true;
        Transition {
            accepted: true,
            events: vec![AttemptEvent::ObjectiveSolved {
                objective_id: objective.id,
            }],
        }
    }

    /// Confirm a solved objective and advance to the next one.
    ///
    /// Emits `ObjectiveCheckedIn`, followed by `QuestCompleted` when this was
    /// the last objective.
    pub fn check_in(&mut self, quest: &Quest) -> Transition {
        if !self.solved_current {
            return Transition::rejected();
        }
        let Some(objective) = current_to_check_in(quest, self) else {
            return Transition::rejected();
        };

        let mut events = vec![AttemptEvent::ObjectiveCheckedIn {
            objective_id: objective.id,
        }];

        self.progress += 1;
        self.solved_current = false;
        if self.progress >= quest.objective_count() {
            self.completed = true;
            events.push(AttemptEvent::QuestCompleted { quest_id: quest.id });
        }

        Transition {
            accepted: true,
            events,
        }
    }
}
