use std::sync::Arc;

use questline_core::service::QuestService;
use questline_db::PgQuestStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: questline_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Quest engine over the Postgres store.
    pub quests: Arc<QuestService<PgQuestStore>>,
}

impl AppState {
    pub fn new(pool: questline_db::DbPool, config: ServerConfig) -> Self {
        let quests = QuestService::new(PgQuestStore::new(pool.clone()));
        Self {
            pool,
            config: Arc::new(config),
            quests: Arc::new(quests),
        }
    }
}
