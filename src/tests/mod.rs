//! Unit and integration tests for the todo service.
//!
//! ## Test Modules
//!
//! - **storage_tests**: the storage contract, run against both backends
//! - **service_tests**: validation and business rules
//! - **api_tests**: the HTTP surface end-to-end through the router
//! - **health_api_tests**: health endpoint and response headers
//! - **error_tests**: error taxonomy and HTTP mapping
//! - **config_tests**: configuration layering and validation
//! - **db_tests**: SQLite schema initialization
//!
//! Individual modules can be run with e.g. `cargo test storage_tests`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::Sqlite;

use crate::config::{AppConfig, StorageBackend};
use crate::storage::{SqliteTodoStorage, StorageError, StorageResult, TodoStorage};
use crate::types::{Todo, TodoCreate, TodoUpdate};

pub mod config_tests;
pub mod health_api_tests;

/// A fresh SQLite-backed store on a private in-memory database.
pub async fn sqlite_storage() -> SqliteTodoStorage {
    let mut cfg = AppConfig::default().storage;
    cfg.backend = StorageBackend::Sqlite;
    cfg.database_url = "sqlite::memory:".to_string();
    let pool = crate::db::connect(&cfg).await.unwrap();
    SqliteTodoStorage::new(pool, Duration::from_millis(cfg.timeout_ms))
}

/// A SQLite store whose only pooled connection is already checked out, so every
/// operation waits past its 50 ms bound. Keep the returned connection alive.
pub async fn stalled_sqlite_storage() -> (SqliteTodoStorage, PoolConnection<Sqlite>) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .acquire_timeout(Duration::from_secs(30))
        .connect("sqlite::memory:")
        .await
        .unwrap();
    crate::db::init_db(&pool).await.unwrap();
    let held = pool.acquire().await.unwrap();
    (SqliteTodoStorage::new(pool, Duration::from_millis(50)), held)
}

pub fn create(title: &str) -> TodoCreate {
    TodoCreate { title: title.to_string() }
}

/// Storage whose every operation fails, to observe fault propagation.
pub struct FailingStorage;

fn fault() -> StorageError {
    StorageError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl TodoStorage for FailingStorage {
    async fn list_all(&self) -> StorageResult<Vec<Todo>> {
        Err(fault())
    }
    async fn get_by_id(&self, _id: i64) -> StorageResult<Option<Todo>> {
        Err(fault())
    }
    async fn create(&self, _data: TodoCreate) -> StorageResult<Todo> {
        Err(fault())
    }
    async fn update(&self, _id: i64, _patch: TodoUpdate) -> StorageResult<Option<Todo>> {
        Err(fault())
    }
    async fn delete(&self, _id: i64) -> StorageResult<bool> {
        Err(fault())
    }
    async fn mark_all_complete(&self) -> StorageResult<u64> {
        Err(fault())
    }
    async fn delete_completed(&self) -> StorageResult<u64> {
        Err(fault())
    }
    async fn delete_all(&self) -> StorageResult<u64> {
        Err(fault())
    }
}

pub fn failing_storage() -> Arc<dyn TodoStorage> {
    Arc::new(FailingStorage)
}

/// Storage with a bug: every operation panics.
pub struct PanickingStorage;

#[async_trait]
impl TodoStorage for PanickingStorage {
    async fn list_all(&self) -> StorageResult<Vec<Todo>> {
        panic!("unexpected bug in list_all")
    }
    async fn get_by_id(&self, _id: i64) -> StorageResult<Option<Todo>> {
        panic!("unexpected bug in get_by_id")
    }
    async fn create(&self, _data: TodoCreate) -> StorageResult<Todo> {
        panic!("unexpected bug in create")
    }
    async fn update(&self, _id: i64, _patch: TodoUpdate) -> StorageResult<Option<Todo>> {
        panic!("unexpected bug in update")
    }
    async fn delete(&self, _id: i64) -> StorageResult<bool> {
        panic!("unexpected bug in delete")
    }
    async fn mark_all_complete(&self) -> StorageResult<u64> {
        panic!("unexpected bug in mark_all_complete")
    }
    async fn delete_completed(&self) -> StorageResult<u64> {
        panic!("unexpected bug in delete_completed")
    }
    async fn delete_all(&self) -> StorageResult<u64> {
        panic!("unexpected bug in delete_all")
    }
}
