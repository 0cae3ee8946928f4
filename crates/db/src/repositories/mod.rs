//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or an open transaction) as the first argument.

pub mod achievement_repo;
pub mod destination_repo;
pub mod profile_repo;
pub mod quest_attempt_repo;
pub mod quest_repo;

pub use achievement_repo::AchievementRepo;
pub use destination_repo::DestinationRepo;
pub use profile_repo::ProfileRepo;
pub use quest_attempt_repo::QuestAttemptRepo;
pub use quest_repo::QuestRepo;
