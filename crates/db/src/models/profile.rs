//! Profile model.

use questline_core::profile::Profile;
use questline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `profiles` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProfileRow {
    pub id: DbId,
    pub username: String,
    pub is_admin: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            is_admin: row.is_admin,
        }
    }
}

/// DTO for creating a profile.
#[derive(Debug, Deserialize)]
pub struct CreateProfile {
    pub username: String,
    pub is_admin: Option<bool>,
}
