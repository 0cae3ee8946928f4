//! Which objective an attempt is currently working on.
//!
//! The pending objective is always `objectives[cursor]`: it is "to solve"
//! until guessed correctly and "to check in" afterwards. Neither exists once
//! the attempt is completed or the cursor has run past the list.

use crate::attempt::QuestAttempt;
use crate::quest::{Objective, Quest};

/// Objective at `cursor`, if the attempt is still in progress.
pub fn pending_objective(objectives: &[Objective], cursor: i32, completed: bool) -> Option<&Objective> {
    if completed || cursor < 0 {
        return None;
    }
    objectives.get(cursor as usize)
}

pub fn current_to_solve<'q>(quest: &'q Quest, attempt: &QuestAttempt) -> Option<&'q Objective> {
    pending_objective(&quest.objectives, attempt.progress, attempt.completed)
}

pub fn current_to_check_in<'q>(quest: &'q Quest, attempt: &QuestAttempt) -> Option<&'q Objective> {
    pending_objective(&quest.objectives, attempt.progress, attempt.completed)
}
