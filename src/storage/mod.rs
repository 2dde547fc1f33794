//! Todo persistence.
//!
//! [`TodoStorage`] is the contract every backend honours; the service layer only ever sees
//! `Arc<dyn TodoStorage>`. Two backends ship with the crate:
//!
//! - [`InMemoryTodoStorage`]: a single mutex around the whole map, used by default and in tests
//! - [`SqliteTodoStorage`]: sqlx/SQLite, every operation bounded by a timeout
//!
//! A missing record is never an error: lookups return `None`, deletes return `false`.
//! `StorageError` is reserved for backend faults.

use std::time::Duration;

use async_trait::async_trait;

use crate::types::{Todo, TodoCreate, TodoUpdate};

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryTodoStorage;
pub use sqlite::SqliteTodoStorage;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("storage operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait TodoStorage: Send + Sync {
    /// All todos, newest first. Ties on `created_at` go to the higher id.
    async fn list_all(&self) -> StorageResult<Vec<Todo>>;

    async fn get_by_id(&self, id: i64) -> StorageResult<Option<Todo>>;

    /// Allocates the next id (never reused) and stamps `created_at`.
    async fn create(&self, data: TodoCreate) -> StorageResult<Todo>;

    /// Applies only the fields present in `patch`. `None` if `id` does not exist.
    async fn update(&self, id: i64, patch: TodoUpdate) -> StorageResult<Option<Todo>>;

    /// Whether a row was actually removed.
    async fn delete(&self, id: i64) -> StorageResult<bool>;

    /// Completes every pending todo; returns how many changed.
    async fn mark_all_complete(&self) -> StorageResult<u64>;

    async fn delete_completed(&self) -> StorageResult<u64>;

    async fn delete_all(&self) -> StorageResult<u64>;
}
