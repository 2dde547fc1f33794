//! Business rules on top of [`TodoStorage`].
//!
//! Validation happens here, before storage is touched, so a rejected request never mutates
//! anything. Storage faults pass through unchanged as [`AppError::Storage`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{validation, AppError, AppResult, OptionExt};
use crate::storage::TodoStorage;
use crate::types::{BulkActionResponse, Todo, TodoCreate, TodoStats, TodoUpdate};

#[derive(Clone)]
pub struct TodoService {
    storage: Arc<dyn TodoStorage>,
}

fn storage_fault(op: &str) -> impl FnOnce(crate::storage::StorageError) -> AppError + '_ {
    move |e| {
        debug!("Error {}: {}", op, e);
        AppError::Storage(e)
    }
}

impl TodoService {
    pub fn new(storage: Arc<dyn TodoStorage>) -> Self {
        Self { storage }
    }

    pub async fn list_all(&self) -> AppResult<Vec<Todo>> {
        let todos = self.storage.list_all().await.map_err(storage_fault("retrieving todos"))?;
        info!("Retrieved {} todos", todos.len());
        Ok(todos)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Todo> {
        validation::validate_id(id)?;
        let todo = self
            .storage
            .get_by_id(id)
            .await
            .map_err(storage_fault("retrieving todo"))?
            .ok_or_not_found(id)?;
        info!("Retrieved todo {}: {}", todo.id, todo.title);
        Ok(todo)
    }

    pub async fn create(&self, data: TodoCreate) -> AppResult<Todo> {
        let title = validation::normalize_title(&data.title)?;
        let todo = self
            .storage
            .create(TodoCreate { title })
            .await
            .map_err(storage_fault("creating todo"))?;
        info!("Created new todo {}: {}", todo.id, todo.title);
        Ok(todo)
    }

    pub async fn update(&self, id: i64, patch: TodoUpdate) -> AppResult<Todo> {
        validation::validate_id(id)?;
        if patch.is_empty() {
            return Err(AppError::Validation(
                "At least one field must be provided for update".to_string(),
            ));
        }
        let title = patch.title.as_deref().map(validation::normalize_title).transpose()?;
        let patch = TodoUpdate { title, completed: patch.completed };

        let todo = self
            .storage
            .update(id, patch)
            .await
            .map_err(storage_fault("updating todo"))?
            .ok_or_not_found(id)?;
        info!("Updated todo {}: {}", todo.id, todo.title);
        Ok(todo)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        validation::validate_id(id)?;
        let deleted = self.storage.delete(id).await.map_err(storage_fault("deleting todo"))?;
        if !deleted {
            return Err(AppError::NotFound(format!("Todo with ID {} not found", id)));
        }
        info!("Deleted todo {}", id);
        Ok(())
    }

    pub async fn stats(&self) -> AppResult<TodoStats> {
        let todos = self.storage.list_all().await.map_err(storage_fault("computing stats"))?;
        let stats = TodoStats::from_todos(&todos);
        info!(
            total = stats.total,
            completed = stats.completed,
            pending = stats.pending,
            "Generated stats"
        );
        Ok(stats)
    }

    pub async fn mark_all_complete(&self) -> AppResult<BulkActionResponse> {
        let affected_count = self
            .storage
            .mark_all_complete()
            .await
            .map_err(storage_fault("marking all todos complete"))?;
        Ok(bulk_response(format!("Marked {} todos as complete", affected_count), affected_count))
    }

    pub async fn delete_completed(&self) -> AppResult<BulkActionResponse> {
        let affected_count = self
            .storage
            .delete_completed()
            .await
            .map_err(storage_fault("deleting completed todos"))?;
        Ok(bulk_response(format!("Deleted {} completed todos", affected_count), affected_count))
    }

    pub async fn delete_all(&self) -> AppResult<BulkActionResponse> {
        let affected_count =
            self.storage.delete_all().await.map_err(storage_fault("deleting all todos"))?;
        Ok(bulk_response(format!("Deleted {} todos", affected_count), affected_count))
    }
}

fn bulk_response(message: String, affected_count: u64) -> BulkActionResponse {
    info!("{}", message);
    BulkActionResponse { message, affected_count }
}
