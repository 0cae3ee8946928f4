//! Repository for the `destinations` table.

use questline_core::types::DbId;
use sqlx::PgPool;

use crate::models::destination::{CreateDestination, DestinationRow};

const COLUMNS: &str = "id, name, created_at, updated_at";

pub struct DestinationRepo;

impl DestinationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateDestination,
    ) -> Result<DestinationRow, sqlx::Error> {
        let query = format!("INSERT INTO destinations (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, DestinationRow>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DestinationRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM destinations WHERE id = $1");
        sqlx::query_as::<_, DestinationRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
