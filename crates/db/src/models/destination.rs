use questline_core::quest::Destination;
use questline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `destinations` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DestinationRow {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<DestinationRow> for Destination {
    fn from(row: DestinationRow) -> Self {
        Destination {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDestination {
    pub name: String,
}
