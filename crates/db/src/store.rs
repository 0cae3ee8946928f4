//! Postgres-backed [`QuestStore`].

use questline_core::achievement::AchievementTracker;
use questline_core::attempt::{NewAttempt, QuestAttempt};
use questline_core::error::{CoreError, QUEST_ATTEMPT_EXISTS, ROW_CHANGED_CONCURRENTLY};
use questline_core::profile::Profile;
use questline_core::quest::{Destination, NewQuest, Quest, QuestEdit};
use questline_core::store::{CommittedProgress, ProgressCommit, QuestStore};
use questline_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::repositories::{
    AchievementRepo, DestinationRepo, ProfileRepo, QuestAttemptRepo, QuestRepo,
};

/// Translate a database error into the domain taxonomy.
///
/// Unique violations become `Conflict`, foreign key violations become
/// `Validation`; anything else is logged and reported as `Internal`.
pub fn map_db_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        match db_err.code().as_deref() {
            Some("23505") => {
                let message = match db_err.constraint() {
                    Some("uq_quest_attempts_profile_quest") => QUEST_ATTEMPT_EXISTS.to_string(),
                    Some(constraint) => format!("Duplicate value violates {constraint}"),
                    None => "Duplicate value".to_string(),
                };
                return CoreError::Conflict(message);
            }
            Some("23503") => {
                return CoreError::Validation(format!(
                    "Referenced record does not exist ({})",
                    db_err.constraint().unwrap_or("foreign key")
                ));
            }
            _ => {}
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Internal(err.to_string())
}

#[derive(Clone)]
pub struct PgQuestStore {
    pool: PgPool,
}

impl PgQuestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Apply a versioned commit inside `tx`. A stale row aborts with
/// `ConcurrentModification`; dropping `tx` then rolls back every write.
async fn write_progress(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    commit: &ProgressCommit,
) -> Result<CommittedProgress, CoreError> {
    let mut committed = CommittedProgress::default();

    if let Some(attempt) = &commit.attempt {
        let row = QuestAttemptRepo::update_versioned(tx, attempt)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| {
                tracing::warn!(attempt_id = attempt.id, "Stale quest attempt version");
                CoreError::ConcurrentModification(ROW_CHANGED_CONCURRENTLY.into())
            })?;
        committed.attempt = Some(row.into());
    }

    if let Some(tracker) = &commit.tracker {
        let (row, badges) = AchievementRepo::update_versioned(tx, tracker)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| {
                tracing::warn!(profile_id = tracker.profile_id, "Stale achievement tracker version");
                CoreError::ConcurrentModification(ROW_CHANGED_CONCURRENTLY.into())
            })?;
        committed.tracker = Some(row.into_tracker(badges)?);
    }

    Ok(committed)
}

impl QuestStore for PgQuestStore {
    async fn find_profile(&self, id: DbId) -> Result<Option<Profile>, CoreError> {
        let row = ProfileRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_db_error)?;
        Ok(row.map(Profile::from))
    }

    async fn find_destination(&self, id: DbId) -> Result<Option<Destination>, CoreError> {
        let row = DestinationRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_db_error)?;
        Ok(row.map(Destination::from))
    }

    async fn find_quest(&self, id: DbId) -> Result<Option<Quest>, CoreError> {
        QuestRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_db_error)
    }

    async fn insert_quest(
        &self,
        input: &NewQuest,
        progress: ProgressCommit,
    ) -> Result<(Quest, CommittedProgress), CoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let quest = QuestRepo::create(&mut tx, input)
            .await
            .map_err(map_db_error)?;
        let committed = write_progress(&mut tx, &progress).await?;
        tx.commit().await.map_err(map_db_error)?;
        Ok((quest, committed))
    }

    async fn replace_quest(&self, quest_id: DbId, edit: &QuestEdit) -> Result<Option<Quest>, CoreError> {
        QuestRepo::replace(&self.pool, quest_id, edit)
            .await
            .map_err(map_db_error)
    }

    async fn delete_quest(&self, quest_id: DbId) -> Result<bool, CoreError> {
        QuestRepo::delete(&self.pool, quest_id)
            .await
            .map_err(map_db_error)
    }

    async fn find_attempt(&self, id: DbId) -> Result<Option<QuestAttempt>, CoreError> {
        let row = QuestAttemptRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_db_error)?;
        Ok(row.map(QuestAttempt::from))
    }

    async fn attempt_exists(&self, profile_id: DbId, quest_id: DbId) -> Result<bool, CoreError> {
        QuestAttemptRepo::exists(&self.pool, profile_id, quest_id)
            .await
            .map_err(map_db_error)
    }

    async fn insert_attempt(&self, input: &NewAttempt) -> Result<QuestAttempt, CoreError> {
        let row = QuestAttemptRepo::create(&self.pool, input)
            .await
            .map_err(map_db_error)?;
        Ok(row.into())
    }

    async fn active_attempt_profiles(&self, quest_id: DbId, now: Timestamp) -> Result<Vec<DbId>, CoreError> {
        QuestAttemptRepo::active_profile_ids(&self.pool, quest_id, now)
            .await
            .map_err(map_db_error)
    }

    async fn list_attempts_for_profile(
        &self,
        profile_id: DbId,
        now: Timestamp,
        completed: bool,
    ) -> Result<Vec<QuestAttempt>, CoreError> {
        let rows = QuestAttemptRepo::list_for_profile(&self.pool, profile_id, now, completed)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(QuestAttempt::from).collect())
    }

    async fn find_tracker(&self, profile_id: DbId) -> Result<Option<AchievementTracker>, CoreError> {
        match AchievementRepo::find_by_profile(&self.pool, profile_id)
            .await
            .map_err(map_db_error)?
        {
            Some((tracker, badges)) => tracker.into_tracker(badges).map(Some),
            None => Ok(None),
        }
    }

    /// Both writes share one transaction; a failed version check rolls back
    /// whatever was already written.
    async fn commit(&self, commit: ProgressCommit) -> Result<CommittedProgress, CoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let committed = write_progress(&mut tx, &commit).await?;
        tx.commit().await.map_err(map_db_error)?;
        Ok(committed)
    }
}
