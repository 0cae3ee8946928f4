//! In-process [`QuestStore`] backed by a single mutex.
//!
//! Used by the service tests and by anything that wants the engine without
//! Postgres. Version checks and the (profile, quest) uniqueness rule behave
//! the same as the database-backed store.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use tokio::sync::Mutex;

use super::{CommittedProgress, ProgressCommit, QuestStore};
use crate::achievement::AchievementTracker;
use crate::attempt::{NewAttempt, QuestAttempt};
use crate::error::{CoreError, QUEST_ATTEMPT_EXISTS, ROW_CHANGED_CONCURRENTLY};
use crate::profile::Profile;
use crate::quest::{Destination, NewQuest, Objective, Quest, QuestEdit};
use crate::types::{DbId, Timestamp};

#[derive(Default)]
struct Tables {
    next_id: DbId,
    profiles: HashMap<DbId, Profile>,
    destinations: HashMap<DbId, Destination>,
    quests: BTreeMap<DbId, Quest>,
    attempts: BTreeMap<DbId, QuestAttempt>,
    trackers: HashMap<DbId, AchievementTracker>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn build_objectives(&mut self, quest_id: DbId, owner_id: DbId, destinations: &[DbId]) -> Vec<Objective> {
        destinations
            .iter()
            .enumerate()
            .map(|(position, &destination_id)| Objective {
                id: self.next_id(),
                quest_id,
                owner_id,
                destination_id,
                position: position as i32,
            })
            .collect()
    }

    /// Fail unless every row in `commit` still has the version it was read with.
    fn check_versions(&self, commit: &ProgressCommit) -> Result<(), CoreError> {
        if let Some(attempt) = &commit.attempt {
            let current = self.attempts.get(&attempt.id).map(|a| a.version);
            if current != Some(attempt.version) {
                return Err(CoreError::ConcurrentModification(ROW_CHANGED_CONCURRENTLY.into()));
            }
        }
        if let Some(tracker) = &commit.tracker {
            let current = self.trackers.get(&tracker.profile_id).map(|a| a.version);
            if current != Some(tracker.version) {
                return Err(CoreError::ConcurrentModification(ROW_CHANGED_CONCURRENTLY.into()));
            }
        }
        Ok(())
    }

    /// Write an already checked commit, bumping each version.
    fn write_progress(&mut self, commit: ProgressCommit) -> CommittedProgress {
        let mut committed = CommittedProgress::default();
        if let Some(mut attempt) = commit.attempt {
            attempt.version += 1;
            self.attempts.insert(attempt.id, attempt.clone());
            committed.attempt = Some(attempt);
        }
        if let Some(mut tracker) = commit.tracker {
            tracker.version += 1;
            self.trackers.insert(tracker.profile_id, tracker.clone());
            committed.tracker = Some(tracker);
        }
        committed
    }

    fn require_destinations(&self, destinations: &[DbId]) -> Result<(), CoreError> {
        match destinations.iter().find(|id| !self.destinations.contains_key(*id)) {
            Some(missing) => Err(CoreError::Validation(format!(
                "Unknown destination {missing}"
            ))),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a profile together with its empty achievement tracker.
    pub async fn add_profile(&self, is_admin: bool) -> Profile {
        let mut t = self.tables.lock().await;
        let profile = Profile {
            id: t.next_id(),
            is_admin,
        };
        t.profiles.insert(profile.id, profile);
        t.trackers
            .insert(profile.id, AchievementTracker::new(profile.id));
        profile
    }

    pub async fn add_destination(&self, name: &str) -> Destination {
        let mut t = self.tables.lock().await;
        let destination = Destination {
            id: t.next_id(),
            name: name.to_string(),
        };
        t.destinations.insert(destination.id, destination.clone());
        destination
    }
}

impl QuestStore for MemoryStore {
    async fn find_profile(&self, id: DbId) -> Result<Option<Profile>, CoreError> {
        Ok(self.tables.lock().await.profiles.get(&id).copied())
    }

    async fn find_destination(&self, id: DbId) -> Result<Option<Destination>, CoreError> {
        Ok(self.tables.lock().await.destinations.get(&id).cloned())
    }

    async fn find_quest(&self, id: DbId) -> Result<Option<Quest>, CoreError> {
        Ok(self.tables.lock().await.quests.get(&id).cloned())
    }

    async fn insert_quest(
        &self,
        input: &NewQuest,
        progress: ProgressCommit,
    ) -> Result<(Quest, CommittedProgress), CoreError> {
        let mut t = self.tables.lock().await;
        t.require_destinations(&input.destinations)?;
        t.check_versions(&progress)?;

        let id = t.next_id();
        let objectives = t.build_objectives(id, input.owner_id, &input.destinations);
        let quest = Quest {
            id,
            owner_id: input.owner_id,
            title: input.title.clone(),
            start_date: input.start_date,
            end_date: input.end_date,
            objectives,
        };
        t.quests.insert(id, quest.clone());
        let committed = t.write_progress(progress);
        Ok((quest, committed))
    }

    async fn replace_quest(&self, quest_id: DbId, edit: &QuestEdit) -> Result<Option<Quest>, CoreError> {
        let mut t = self.tables.lock().await;
        t.require_destinations(&edit.destinations)?;

        let Some((owner_id, before)) = t
            .quests
            .get(&quest_id)
            .map(|q| (q.owner_id, q.destination_ids()))
        else {
            return Ok(None);
        };
        let objectives = t.build_objectives(quest_id, owner_id, &edit.destinations);
        let count = objectives.len() as i32;
        let quest = Quest {
            id: quest_id,
            owner_id,
            title: edit.title.clone(),
            start_date: edit.start_date,
            end_date: edit.end_date,
            objectives,
        };
        t.quests.insert(quest_id, quest.clone());

        for attempt in t.attempts.values_mut() {
            if attempt.quest_id != quest_id || attempt.completed {
                continue;
            }
            if attempt.progress >= count {
                attempt.progress = count;
                attempt.solved_current = false;
                attempt.completed = true;
                attempt.version += 1;
            } else if attempt.solved_current {
                let cursor = attempt.progress as usize;
                if before.get(cursor) != edit.destinations.get(cursor) {
                    attempt.solved_current = false;
                    attempt.version += 1;
                }
            }
        }
        Ok(Some(quest))
    }

    async fn delete_quest(&self, quest_id: DbId) -> Result<bool, CoreError> {
        let mut t = self.tables.lock().await;
        if t.quests.remove(&quest_id).is_none() {
            return Ok(false);
        }
        t.attempts.retain(|_, a| a.quest_id != quest_id);
        Ok(true)
    }

    async fn find_attempt(&self, id: DbId) -> Result<Option<QuestAttempt>, CoreError> {
        Ok(self.tables.lock().await.attempts.get(&id).cloned())
    }

    async fn attempt_exists(&self, profile_id: DbId, quest_id: DbId) -> Result<bool, CoreError> {
        Ok(self
            .tables
            .lock()
            .await
            .attempts
            .values()
            .any(|a| a.profile_id == profile_id && a.quest_id == quest_id))
    }

    async fn insert_attempt(&self, input: &NewAttempt) -> Result<QuestAttempt, CoreError> {
        let mut t = self.tables.lock().await;
        let exists = t
            .attempts
            .values()
            .any(|a| a.profile_id == input.profile_id && a.quest_id == input.quest_id);
        if exists {
            return Err(CoreError::Conflict(QUEST_ATTEMPT_EXISTS.into()));
        }

        let attempt = QuestAttempt {
            id: t.next_id(),
            quest_id: input.quest_id,
            profile_id: input.profile_id,
            progress: 0,
            solved_current: false,
            completed: input.completed,
            version: 0,
            created_at: Utc::now(),
        };
        t.attempts.insert(attempt.id, attempt.clone());
        Ok(attempt)
    }

    async fn active_attempt_profiles(&self, quest_id: DbId, now: Timestamp) -> Result<Vec<DbId>, CoreError> {
        let t = self.tables.lock().await;
        let available = t
            .quests
            .get(&quest_id)
            .is_some_and(|q| q.is_available(now));
        if !available {
            return Ok(Vec::new());
        }
        Ok(t.attempts
            .values()
            .filter(|a| a.quest_id == quest_id && !a.completed)
            .map(|a| a.profile_id)
            .collect())
    }

    async fn list_attempts_for_profile(
        &self,
        profile_id: DbId,
        now: Timestamp,
        completed: bool,
    ) -> Result<Vec<QuestAttempt>, CoreError> {
        let t = self.tables.lock().await;
        Ok(t.attempts
            .values()
            .filter(|a| a.profile_id == profile_id && a.completed == completed)
            .filter(|a| t.quests.get(&a.quest_id).is_some_and(|q| q.is_available(now)))
            .cloned()
            .collect())
    }

    async fn find_tracker(&self, profile_id: DbId) -> Result<Option<AchievementTracker>, CoreError> {
        Ok(self.tables.lock().await.trackers.get(&profile_id).cloned())
    }

    async fn commit(&self, commit: ProgressCommit) -> Result<CommittedProgress, CoreError> {
        let mut t = self.tables.lock().await;
        t.check_versions(&commit)?;
        Ok(t.write_progress(commit))
    }
}
