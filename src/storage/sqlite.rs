use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;

use super::{StorageError, StorageResult, TodoStorage};
use crate::types::{Todo, TodoCreate, TodoUpdate};

const TODO_COLUMNS: &str = "id, title, completed, created_at";

#[derive(sqlx::FromRow)]
struct TodoRow {
    id: i64,
    title: String,
    completed: bool,
    created_at: String,
}

impl TryFrom<TodoRow> for Todo {
    type Error = StorageError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| {
                StorageError::Corrupt(format!(
                    "todo {} has invalid created_at {:?}: {}",
                    row.id, row.created_at, e
                ))
            })?
            .with_timezone(&Utc);
        Ok(Todo { id: row.id, title: row.title, completed: row.completed, created_at })
    }
}

// Fixed-width UTC text so ORDER BY created_at matches chronological order.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// SQLite-backed storage. Expects the schema from [`crate::db::init_db`].
///
/// Every operation is a single statement, so SQLite's implicit transaction makes each one
/// atomic. `AUTOINCREMENT` keeps ids from being reused after deletes.
#[derive(Clone)]
pub struct SqliteTodoStorage {
    pool: SqlitePool,
    timeout: Duration,
}

impl SqliteTodoStorage {
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    async fn bounded<T, F>(&self, fut: F) -> StorageResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(res) => res.map_err(StorageError::from),
            Err(_) => {
                tracing::warn!("SQLite operation exceeded {:?}", self.timeout);
                Err(StorageError::Timeout(self.timeout))
            }
        }
    }
}

#[async_trait]
impl TodoStorage for SqliteTodoStorage {
    async fn list_all(&self) -> StorageResult<Vec<Todo>> {
        let query = format!("SELECT {} FROM todos ORDER BY created_at DESC, id DESC", TODO_COLUMNS);
        let rows: Vec<TodoRow> =
            self.bounded(sqlx::query_as::<_, TodoRow>(&query).fetch_all(&self.pool)).await?;
        rows.into_iter().map(Todo::try_from).collect()
    }

    async fn get_by_id(&self, id: i64) -> StorageResult<Option<Todo>> {
        let query = format!("SELECT {} FROM todos WHERE id = ?1", TODO_COLUMNS);
        let row: Option<TodoRow> = self
            .bounded(sqlx::query_as::<_, TodoRow>(&query).bind(id).fetch_optional(&self.pool))
            .await?;
        row.map(Todo::try_from).transpose()
    }

    async fn create(&self, data: TodoCreate) -> StorageResult<Todo> {
        let query = format!(
            "INSERT INTO todos (title, completed, created_at) VALUES (?1, 0, ?2) RETURNING {}",
            TODO_COLUMNS
        );
        let row: TodoRow = self
            .bounded(
                sqlx::query_as::<_, TodoRow>(&query)
                    .bind(data.title)
                    .bind(format_timestamp(Utc::now()))
                    .fetch_one(&self.pool),
            )
            .await?;
        Todo::try_from(row)
    }

    async fn update(&self, id: i64, patch: TodoUpdate) -> StorageResult<Option<Todo>> {
        let query = format!(
            "UPDATE todos SET title = COALESCE(?1, title), completed = COALESCE(?2, completed) \
             WHERE id = ?3 RETURNING {}",
            TODO_COLUMNS
        );
        let row: Option<TodoRow> = self
            .bounded(
                sqlx::query_as::<_, TodoRow>(&query)
                    .bind(patch.title)
                    .bind(patch.completed)
                    .bind(id)
                    .fetch_optional(&self.pool),
            )
            .await?;
        row.map(Todo::try_from).transpose()
    }

    async fn delete(&self, id: i64) -> StorageResult<bool> {
        let res = self
            .bounded(sqlx::query("DELETE FROM todos WHERE id = ?1").bind(id).execute(&self.pool))
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn mark_all_complete(&self) -> StorageResult<u64> {
        let res = self
            .bounded(sqlx::query("UPDATE todos SET completed = 1 WHERE completed = 0").execute(&self.pool))
            .await?;
        Ok(res.rows_affected())
    }

    async fn delete_completed(&self) -> StorageResult<u64> {
        let res = self
            .bounded(sqlx::query("DELETE FROM todos WHERE completed = 1").execute(&self.pool))
            .await?;
        Ok(res.rows_affected())
    }

    async fn delete_all(&self) -> StorageResult<u64> {
        let res = self.bounded(sqlx::query("DELETE FROM todos").execute(&self.pool)).await?;
        Ok(res.rows_affected())
    }
}
