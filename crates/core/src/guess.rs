//! Guess evaluation: identity match only, no partial credit.

use crate::quest::Objective;
use crate::types::DbId;

pub fn is_correct_guess(objective: &Objective, guessed_destination_id: DbId) -> bool {
    objective.destination_id == guessed_destination_id
}
