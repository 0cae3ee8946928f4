//! Edit-lock policy for quest objective lists.
//!
//! While any other profile has an active attempt on a quest, the target
//! destination at every position both lists share must stay the same.
//! Titles, windows and trailing objectives can still change. The lock does
//! not look at individual cursors: one active attempt anywhere locks every
//! shared position.

use crate::quest::Quest;
use crate::types::DbId;

/// First position whose destination differs, comparing up to the shorter list.
pub fn first_changed_position(before: &[DbId], after: &[DbId]) -> Option<usize> {
    before
        .iter()
        .zip(after.iter())
        .position(|(b, a)| b != a)
}

/// Whether replacing `before`'s objectives with `after_destinations` is allowed
/// given the profiles that currently have active attempts.
pub fn can_edit(before: &Quest, after_destinations: &[DbId], active_profiles: &[DbId]) -> bool {
    if active_profiles.is_empty() {
        return true;
    }
    first_changed_position(&before.destination_ids(), after_destinations).is_none()
}
