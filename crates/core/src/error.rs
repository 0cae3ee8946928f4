use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Another request changed the same row first. The caller may retry.
    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A request would break a rule that protects existing data.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the same request could succeed if sent again unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoreError::Conflict(_) | CoreError::ConcurrentModification(_)
        )
    }
}

/* --------------------------------------------------------------------------
Entity names used in `CoreError::NotFound`
-------------------------------------------------------------------------- */

pub const ENTITY_QUEST: &str = "Quest";
pub const ENTITY_PROFILE: &str = "Profile";
pub const ENTITY_ATTEMPT: &str = "QuestAttempt";
pub const ENTITY_DESTINATION: &str = "Destination";
pub const ENTITY_TRACKER: &str = "AchievementTracker";

/* --------------------------------------------------------------------------
Failure messages
-------------------------------------------------------------------------- */

/// A profile tried to start a quest it owns.
pub const START_OWN_QUEST: &str = "You cannot attempt a quest you own";

/// The (profile, quest) pair already has an attempt.
pub const QUEST_ATTEMPT_EXISTS: &str = "An attempt for this quest already exists";

/// The caller is neither the attempting profile nor an admin.
pub const NOT_ATTEMPT_OWNER: &str = "You are not permitted to act on this quest attempt";

/// The caller is neither the quest owner nor an admin.
pub const NOT_QUEST_OWNER: &str = "You are not permitted to modify this quest";

/// The caller tried to act on behalf of another profile without being an admin.
pub const NOT_PROFILE_OWNER: &str = "You are not permitted to act for this profile";

/// Only admins may grant rewards directly.
pub const ADMIN_REQUIRED: &str = "Admin privileges required";

/// Check-in before solving, or on a completed attempt.
pub const CHECK_IN_NOT_ALLOWED: &str =
    "Cannot check in: the current objective is unsolved or the quest is complete";

/// Edit changes an objective destination while other profiles are mid-attempt.
pub const QUEST_CANNOT_BE_EDITED: &str =
    "Quest objectives cannot be changed while other users have the quest active";

/// Optimistic version check failed on an attempt or achievement tracker.
pub const ROW_CHANGED_CONCURRENTLY: &str =
    "The record was modified by another request; retry the operation";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_and_concurrent_modification_are_retryable() {
        assert!(CoreError::Conflict(QUEST_ATTEMPT_EXISTS.into()).is_retryable());
        assert!(CoreError::ConcurrentModification(ROW_CHANGED_CONCURRENTLY.into()).is_retryable());
    }

    #[test]
    fn forbidden_and_not_found_are_not_retryable() {
        assert!(!CoreError::Forbidden(START_OWN_QUEST.into()).is_retryable());
        assert!(!CoreError::NotFound {
            entity: ENTITY_QUEST,
            id: 1
        }
        .is_retryable());
        assert!(!CoreError::InvariantViolation(QUEST_CANNOT_BE_EDITED.into()).is_retryable());
    }

    #[test]
    fn not_found_display_names_entity_and_id() {
        let err = CoreError::NotFound {
            entity: ENTITY_ATTEMPT,
            id: 7,
        };
        assert_eq!(err.to_string(), "Entity not found: QuestAttempt with id 7");
    }
}
