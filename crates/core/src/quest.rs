//! Quest and objective domain types plus input validation.
//!
//! Relationships are plain ids; everything is loaded through the
//! [`QuestStore`](crate::store::QuestStore) rather than kept as live graphs.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum length of a quest title.
pub const MAX_TITLE_LENGTH: usize = 255;

/// A destination an objective can point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Destination {
    pub id: DbId,
    pub name: String,
}

/// One location-guessing challenge at a fixed position in a quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Objective {
    pub id: DbId,
    pub quest_id: DbId,
    pub owner_id: DbId,
    pub destination_id: DbId,
    /// Index in the quest's objective sequence.
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quest {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    /// Ordered by `position`.
    pub objectives: Vec<Objective>,
}

impl Quest {
    pub fn objective_count(&self) -> i32 {
        self.objectives.len() as i32
    }

    /// Whether `now` lies within `[start_date, end_date)`.
    pub fn is_available(&self, now: Timestamp) -> bool {
        self.start_date <= now && now < self.end_date
    }

    pub fn destination_ids(&self) -> Vec<DbId> {
        self.objectives.iter().map(|o| o.destination_id).collect()
    }
}

/// Input for creating a quest. Objectives are given as destination ids in order.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuest {
    pub owner_id: DbId,
    pub title: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub destinations: Vec<DbId>,
}

/// Replacement definition for an existing quest.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestEdit {
    pub title: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub destinations: Vec<DbId>,
}

impl From<&NewQuest> for QuestEdit {
    fn from(q: &NewQuest) -> Self {
        QuestEdit {
            title: q.title.clone(),
            start_date: q.start_date,
            end_date: q.end_date,
            destinations: q.destinations.clone(),
        }
    }
}

/// Validate a quest title: non-blank and at most [`MAX_TITLE_LENGTH`] characters.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Quest title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Quest title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate that the availability window is non-empty.
pub fn validate_window(start: Timestamp, end: Timestamp) -> Result<(), CoreError> {
    if start >= end {
        return Err(CoreError::Validation(
            "Quest start date must be before its end date".into(),
        ));
    }
    Ok(())
}

pub fn validate_edit(edit: &QuestEdit) -> Result<(), CoreError> {
    validate_title(&edit.title)?;
    validate_window(edit.start_date, edit.end_date)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;

    fn quest_between(start: Timestamp, end: Timestamp) -> Quest {
        Quest {
            id: 1,
            owner_id: 1,
            title: "Harbour loop".into(),
            start_date: start,
            end_date: end,
            objectives: vec![],
        }
    }

    #[test]
    fn available_within_window() {
        let now = Utc::now();
        let quest = quest_between(now - Duration::days(1), now + Duration::days(1));
        assert!(quest.is_available(now));
    }

    #[test]
    fn window_is_half_open() {
        let now = Utc::now();
        assert!(quest_between(now, now + Duration::hours(1)).is_available(now));
        assert!(!quest_between(now - Duration::hours(1), now).is_available(now));
    }

    #[test]
    fn blank_title_rejected() {
        assert_matches!(validate_title("   "), Err(CoreError::Validation(_)));
    }

    #[test]
    fn overlong_title_rejected() {
        let title = "x".repeat(MAX_TITLE_LENGTH + 1);
        assert_matches!(validate_title(&title), Err(CoreError::Validation(_)));
        assert!(validate_title(&"x".repeat(MAX_TITLE_LENGTH)).is_ok());
    }

    #[test]
    fn inverted_window_rejected() {
        let now = Utc::now();
        assert_matches!(
            validate_window(now, now - Duration::days(1)),
            Err(CoreError::Validation(_))
        );
        assert_matches!(validate_window(now, now), Err(CoreError::Validation(_)));
    }
}
