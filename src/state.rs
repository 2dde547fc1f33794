use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppConfig, StorageBackend};
use crate::storage::{InMemoryTodoStorage, SqliteTodoStorage, TodoStorage};
use crate::service::TodoService;

/// The shared application state.
///
/// Built once at startup and handed to the router; handlers reach storage only through
/// the service. Tests construct it directly with fresh storage per test.
#[derive(Clone)]
pub struct AppState {
    /// Validation and business rules over the configured storage backend.
    pub service: TodoService,
    /// The application configuration.
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(storage: Arc<dyn TodoStorage>, config: AppConfig) -> Self {
        Self { service: TodoService::new(storage), config: Arc::new(config) }
    }

    /// Convenience for tests and demos: default config over an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryTodoStorage::new()), AppConfig::default())
    }
}

/// Builds the storage backend selected by `config.storage.backend`.
pub async fn build_storage(config: &AppConfig) -> anyhow::Result<Arc<dyn TodoStorage>> {
    match config.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryTodoStorage::new())),
        StorageBackend::Sqlite => {
            let pool = crate::db::connect(&config.storage).await?;
            let timeout = Duration::from_millis(config.storage.timeout_ms);
            Ok(Arc::new(SqliteTodoStorage::new(pool, timeout)))
        }
    }
}
