//! Quest engine operations.
//!
//! [`QuestService`] ties the pure modules together over a [`QuestStore`]:
//! load rows, check who is calling, run the state machine or edit-lock, feed
//! the resulting events to the reward engine and persist attempt and tracker
//! in one [`ProgressCommit`]. The caller's profile id is always passed in
//! explicitly.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::achievement::{
    reward, reward_all, reward_objective_solved, reward_quest_interaction, AchievementTracker,
    RewardResult,
};
use crate::attempt::{NewAttempt, QuestAttempt};
use crate::edit_lock::{can_edit, first_changed_position};
use crate::error::{
    CoreError, ADMIN_REQUIRED, ENTITY_ATTEMPT, ENTITY_DESTINATION, ENTITY_PROFILE, ENTITY_QUEST, ENTITY_TRACKER,
    NOT_ATTEMPT_OWNER, NOT_PROFILE_OWNER, NOT_QUEST_OWNER, QUEST_ATTEMPT_EXISTS,
    QUEST_CANNOT_BE_EDITED, START_OWN_QUEST,
};
use crate::profile::Profile;
use crate::quest::{validate_edit, NewQuest, Quest, QuestEdit};
use crate::reward_catalog::ActionKind;
use crate::store::{ProgressCommit, QuestStore};
use crate::types::DbId;

/// What a directly granted reward refers to. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RewardSubject {
    Quest(DbId),
    Objective(DbId),
    Trip(DbId),
}

#[derive(Debug, Clone, Serialize)]
pub struct GuessOutcome {
    pub correct: bool,
    pub attempt: QuestAttempt,
    pub reward: RewardResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckInOutcome {
    pub admitted: bool,
    pub attempt: QuestAttempt,
    pub reward: RewardResult,
}

pub struct QuestService<S> {
    store: S,
}

impl<S: QuestStore> QuestService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ---------------------------------------------------------------------------
    // Quests
    // ---------------------------------------------------------------------------

    /// Create a quest for `input.owner_id` and reward the owner.
    ///
    /// The quest row and the owner's reward are stored in one write, so a
    /// concurrent reward to the same owner fails the call without leaving a
    /// quest behind.
    pub async fn create_quest(
        &self,
        caller: DbId,
        input: NewQuest,
    ) -> Result<(Quest, RewardResult), CoreError> {
        let caller = self.require_profile(caller).await?;
        if !caller.can_act_for(input.owner_id) {
            return Err(CoreError::Forbidden(NOT_PROFILE_OWNER.into()));
        }
        self.require_profile(input.owner_id).await?;
        validate_edit(&QuestEdit::from(&input))?;
        self.require_destinations(&input.destinations).await?;

        let mut tracker = self.require_tracker(input.owner_id).await?;
        let reward = reward_quest_interaction(&mut tracker, ActionKind::QuestCreated);
        let (quest, _) = self
            .store
            .insert_quest(
                &input,
                ProgressCommit {
                    attempt: None,
                    tracker: (!reward.is_empty()).then_some(tracker),
                },
            )
            .await?;

        tracing::info!(
            quest_id = quest.id,
            owner_id = quest.owner_id,
            objectives = quest.objective_count(),
            points = reward.total_points(),
            "Quest created",
        );
        Ok((quest, reward))
    }

    /// Replace a quest's title, window and objectives, subject to the edit-lock.
    pub async fn edit_quest(
        &self,
        caller: DbId,
        quest_id: DbId,
        edit: QuestEdit,
    ) -> Result<Quest, CoreError> {
        let caller = self.require_profile(caller).await?;
        let quest = self.require_quest(quest_id).await?;
        if !caller.can_act_for(quest.owner_id) {
            return Err(CoreError::Forbidden(NOT_QUEST_OWNER.into()));
        }
        validate_edit(&edit)?;
        self.require_destinations(&edit.destinations).await?;

        let active = self
            .store
            .active_attempt_profiles(quest_id, Utc::now())
            .await?;
        if !can_edit(&quest, &edit.destinations, &active) {
            tracing::warn!(
                quest_id,
                active_profiles = active.len(),
                position = ?first_changed_position(&quest.destination_ids(), &edit.destinations),
                "Quest edit rejected by edit-lock",
            );
            return Err(CoreError::InvariantViolation(QUEST_CANNOT_BE_EDITED.into()));
        }

        let updated = self
            .store
            .replace_quest(quest_id, &edit)
            .await?
            .ok_or(CoreError::NotFound {
                entity: ENTITY_QUEST,
                id: quest_id,
            })?;

        tracing::info!(
            quest_id,
            objectives = updated.objective_count(),
            "Quest updated",
        );
        Ok(updated)
    }

    pub async fn delete_quest(&self, caller: DbId, quest_id: DbId) -> Result<(), CoreError> {
        let caller = self.require_profile(caller).await?;
        let quest = self.require_quest(quest_id).await?;
        if !caller.can_act_for(quest.owner_id) {
            return Err(CoreError::Forbidden(NOT_QUEST_OWNER.into()));
        }

        if !self.store.delete_quest(quest_id).await? {
            return Err(CoreError::NotFound {
                entity: ENTITY_QUEST,
                id: quest_id,
            });
        }
        tracing::info!(quest_id, deleted_by = caller.id, "Quest deleted");
        Ok(())
    }

    /// Profiles currently mid-attempt on a quest.
    pub async fn active_profiles(&self, quest_id: DbId) -> Result<Vec<DbId>, CoreError> {
        self.require_quest(quest_id).await?;
        self.store.active_attempt_profiles(quest_id, Utc::now()).await
    }

    // ---------------------------------------------------------------------------
    // Attempts
    // ---------------------------------------------------------------------------

    pub async fn create_attempt(
        &self,
        caller: DbId,
        quest_id: DbId,
        profile_id: DbId,
    ) -> Result<QuestAttempt, CoreError> {
        let caller = self.require_profile(caller).await?;
        if !caller.can_act_for(profile_id) {
            return Err(CoreError::Forbidden(NOT_PROFILE_OWNER.into()));
        }
        self.require_profile(profile_id).await?;
        let quest = self.require_quest(quest_id).await?;

        if quest.owner_id == profile_id {
            return Err(CoreError::Forbidden(START_OWN_QUEST.into()));
        }
        // Fast path only; the store's uniqueness rule settles races.
        if self.store.attempt_exists(profile_id, quest_id).await? {
            return Err(CoreError::Conflict(QUEST_ATTEMPT_EXISTS.into()));
        }

        let attempt = self
            .store
            .insert_attempt(&NewAttempt::for_quest(&quest, profile_id))
            .await?;

        tracing::info!(
            attempt_id = attempt.id,
            quest_id,
            profile_id,
            completed = attempt.completed,
            "Quest attempt created",
        );
        Ok(attempt)
    }

    /// Guess the destination of the attempt's pending objective.
    pub async fn solve_current(
        &self,
        caller: DbId,
        attempt_id: DbId,
        destination_id: DbId,
    ) -> Result<GuessOutcome, CoreError> {
        let mut attempt = self.require_attempt_for(caller, attempt_id).await?;
        if self.store.find_destination(destination_id).await?.is_none() {
            return Err(CoreError::NotFound {
                entity: ENTITY_DESTINATION,
                id: destination_id,
            });
        }
        let quest = self.require_quest(attempt.quest_id).await?;

        let transition = attempt.solve_current(&quest, destination_id);
        if !transition.accepted {
            return Ok(GuessOutcome {
                correct: false,
                attempt,
                reward: RewardResult::default(),
            });
        }

        let (attempt, reward) = self
            .commit_transition(attempt, reward_objective_solved)
            .await?;

        tracing::info!(attempt_id, progress = attempt.progress, "Objective solved");
        Ok(GuessOutcome {
            correct: true,
            attempt,
            reward,
        })
    }

    /// Confirm the solved objective, advance the cursor and reward the profile.
    ///
    /// Check-in reward and, on the last objective, completion reward are
    /// persisted together with the attempt in one commit.
    pub async fn check_in(&self, caller: DbId, attempt_id: DbId) -> Result<CheckInOutcome, CoreError> {
        let mut attempt = self.require_attempt_for(caller, attempt_id).await?;
        let quest = self.require_quest(attempt.quest_id).await?;

        let transition = attempt.check_in(&quest);
        if !transition.accepted {
            tracing::debug!(attempt_id, "Check-in not admitted");
            return Ok(CheckInOutcome {
                admitted: false,
                attempt,
                reward: RewardResult::default(),
            });
        }

        let (attempt, reward) = self
            .commit_transition(attempt, |tracker| reward_all(tracker, transition.actions()))
            .await?;

        tracing::info!(
            attempt_id,
            progress = attempt.progress,
            completed = attempt.completed,
            points = reward.total_points(),
            badges = reward.badges_achieved.len(),
            "Objective checked in",
        );
        Ok(CheckInOutcome {
            admitted: true,
            attempt,
            reward,
        })
    }

    /// Attempts on currently available quests, filtered by completion.
    ///
    /// Any profile may read these; they are shown on public profiles.
    pub async fn list_attempts(
        &self,
        caller: DbId,
        profile_id: DbId,
        completed: bool,
    ) -> Result<Vec<QuestAttempt>, CoreError> {
        self.require_profile(caller).await?;
        self.require_profile(profile_id).await?;
        self.store
            .list_attempts_for_profile(profile_id, Utc::now(), completed)
            .await
    }

    // ---------------------------------------------------------------------------
    // Achievements
    // ---------------------------------------------------------------------------

    /// Grant the reward for `action` to a profile directly.
    pub async fn reward_action(
        &self,
        profile_id: DbId,
        action: ActionKind,
        subject: Option<RewardSubject>,
    ) -> Result<RewardResult, CoreError> {
        self.require_profile(profile_id).await?;
        let result = self.apply_reward(profile_id, action).await?;

        tracing::info!(
            profile_id,
            action = action.as_str(),
            subject = ?subject,
            points = result.total_points(),
            "Reward granted",
        );
        Ok(result)
    }

    /// Load the caller's profile, failing unless it is an admin.
    pub async fn require_admin(&self, caller: DbId) -> Result<Profile, CoreError> {
        let profile = self.require_profile(caller).await?;
        if !profile.is_admin {
            return Err(CoreError::Forbidden(ADMIN_REQUIRED.into()));
        }
        Ok(profile)
    }

    /// Points and badges of any profile.
    pub async fn achievements(
        &self,
        caller: DbId,
        profile_id: DbId,
    ) -> Result<AchievementTracker, CoreError> {
        self.require_profile(caller).await?;
        self.require_profile(profile_id).await?;
        self.require_tracker(profile_id).await
    }

    // ---------------------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------------------

    /// Persist an accepted transition together with the rewards it earned.
    async fn commit_transition(
        &self,
        attempt: QuestAttempt,
        award: impl FnOnce(&mut AchievementTracker) -> RewardResult,
    ) -> Result<(QuestAttempt, RewardResult), CoreError> {
        let mut tracker = self.require_tracker(attempt.profile_id).await?;
        let reward = award(&mut tracker);

        let committed = self
            .store
            .commit(ProgressCommit {
                attempt: Some(attempt),
                tracker: (!reward.is_empty()).then_some(tracker),
            })
            .await?;
        let attempt = committed
            .attempt
            .ok_or_else(|| CoreError::Internal("Attempt missing from commit".into()))?;
        Ok((attempt, reward))
    }

    async fn apply_reward(&self, profile_id: DbId, action: ActionKind) -> Result<RewardResult, CoreError> {
        let mut tracker = self.require_tracker(profile_id).await?;
        let result = reward(&mut tracker, action);
        if !result.is_empty() {
            self.store
                .commit(ProgressCommit {
                    attempt: None,
                    tracker: Some(tracker),
                })
                .await?;
        }
        Ok(result)
    }

    async fn require_profile(&self, id: DbId) -> Result<Profile, CoreError> {
        self.store
            .find_profile(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: ENTITY_PROFILE,
                id,
            })
    }

    async fn require_quest(&self, id: DbId) -> Result<Quest, CoreError> {
        self.store.find_quest(id).await?.ok_or(CoreError::NotFound {
            entity: ENTITY_QUEST,
            id,
        })
    }

    /// Load an attempt the caller may act on.
    async fn require_attempt_for(&self, caller: DbId, id: DbId) -> Result<QuestAttempt, CoreError> {
        let attempt = self.store.find_attempt(id).await?.ok_or(CoreError::NotFound {
            entity: ENTITY_ATTEMPT,
            id,
        })?;
        let caller = self.require_profile(caller).await?;
        if !caller.can_act_for(attempt.profile_id) {
            return Err(CoreError::Forbidden(NOT_ATTEMPT_OWNER.into()));
        }
        Ok(attempt)
    }

    /// Every profile is created with a tracker, so a missing one is a data fault.
    async fn require_tracker(&self, profile_id: DbId) -> Result<AchievementTracker, CoreError> {
        self.store.find_tracker(profile_id).await?.ok_or_else(|| {
            tracing::error!(profile_id, "Profile has no achievement tracker");
            CoreError::Internal(format!(
                "{ENTITY_TRACKER} missing for profile {profile_id}"
            ))
        })
    }

    async fn require_destinations(&self, ids: &[DbId]) -> Result<(), CoreError> {
        for &id in ids {
            if self.store.find_destination(id).await?.is_none() {
                return Err(CoreError::NotFound {
                    entity: ENTITY_DESTINATION,
                    id,
                });
            }
        }
        Ok(())
    }
}
