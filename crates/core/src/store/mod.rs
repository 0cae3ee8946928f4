//! Persistence boundary for the quest engine.
//!
//! [`QuestStore`] is everything [`QuestService`](crate::service::QuestService)
//! needs from storage. Implementations must honour two guarantees:
//!
//! - `insert_attempt` rejects a second attempt for the same (profile, quest)
//!   with `CoreError::Conflict`, even when two inserts race.
//! - `commit` (and the progress half of `insert_quest`) writes attempt and
//!   tracker together or not at all, and only if each row still has the
//!   version it was read with. Otherwise it fails with
//!   `CoreError::ConcurrentModification`.

pub mod memory;

use std::future::Future;

use crate::achievement::AchievementTracker;
use crate::attempt::{NewAttempt, QuestAttempt};
use crate::error::CoreError;
use crate::profile::Profile;
use crate::quest::{Destination, NewQuest, Quest, QuestEdit};
use crate::types::{DbId, Timestamp};

/// Attempt and tracker states to persist atomically.
///
/// Each value carries the `version` it was loaded with; the store writes it
/// back with `version + 1` only if the stored row still has that version.
#[derive(Debug, Clone, Default)]
pub struct ProgressCommit {
    pub attempt: Option<QuestAttempt>,
    pub tracker: Option<AchievementTracker>,
}

impl ProgressCommit {
    pub fn is_empty(&self) -> bool {
        self.attempt.is_none() && self.tracker.is_none()
    }
}

/// Rows as stored after a successful [`QuestStore::commit`].
#[derive(Debug, Clone, Default)]
pub struct CommittedProgress {
    pub attempt: Option<QuestAttempt>,
    pub tracker: Option<AchievementTracker>,
}

pub trait QuestStore: Send + Sync {
    fn find_profile(
        &self,
        id: DbId,
    ) -> impl Future<Output = Result<Option<Profile>, CoreError>> + Send;

    fn find_destination(
        &self,
        id: DbId,
    ) -> impl Future<Output = Result<Option<Destination>, CoreError>> + Send;

    /// Load a quest with its objectives ordered by position.
    fn find_quest(&self, id: DbId) -> impl Future<Output = Result<Option<Quest>, CoreError>> + Send;

    /// Insert a quest and apply `progress` in the same write.
    ///
    /// A stale version in `progress` fails the whole call with
    /// `CoreError::ConcurrentModification` and no quest is stored.
    fn insert_quest(
        &self,
        input: &NewQuest,
        progress: ProgressCommit,
    ) -> impl Future<Output = Result<(Quest, CommittedProgress), CoreError>> + Send;

    /// Replace title, window and objective list.
    ///
    /// In the same write, attempts whose cursor is at or beyond the new
    /// objective count are marked completed, and attempts whose pending
    /// objective now points at a different destination lose their solved
    /// flag. Returns `None` if the quest is gone.
    fn replace_quest(
        &self,
        quest_id: DbId,
        edit: &QuestEdit,
    ) -> impl Future<Output = Result<Option<Quest>, CoreError>> + Send;

    /// Delete a quest and, by cascade, its objectives and attempts.
    fn delete_quest(&self, quest_id: DbId) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn find_attempt(
        &self,
        id: DbId,
    ) -> impl Future<Output = Result<Option<QuestAttempt>, CoreError>> + Send;

    fn attempt_exists(
        &self,
        profile_id: DbId,
        quest_id: DbId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn insert_attempt(
        &self,
        input: &NewAttempt,
    ) -> impl Future<Output = Result<QuestAttempt, CoreError>> + Send;

    /// Profiles with an uncompleted attempt on a quest that is available at `now`.
    fn active_attempt_profiles(
        &self,
        quest_id: DbId,
        now: Timestamp,
    ) -> impl Future<Output = Result<Vec<DbId>, CoreError>> + Send;

    /// A profile's attempts on quests available at `now`, filtered by completion.
    fn list_attempts_for_profile(
        &self,
        profile_id: DbId,
        now: Timestamp,
        completed: bool,
    ) -> impl Future<Output = Result<Vec<QuestAttempt>, CoreError>> + Send;

    fn find_tracker(
        &self,
        profile_id: DbId,
    ) -> impl Future<Output = Result<Option<AchievementTracker>, CoreError>> + Send;

    fn commit(
        &self,
        commit: ProgressCommit,
    ) -> impl Future<Output = Result<CommittedProgress, CoreError>> + Send;
}
