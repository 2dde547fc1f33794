use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{StorageResult, TodoStorage};
use crate::types::{Todo, TodoCreate, TodoUpdate};

struct Inner {
    todos: BTreeMap<i64, Todo>,
    next_id: i64,
}

/// Process-local storage. One lock guards the map and the id counter together, and every
/// operation holds it for its whole read-modify-write without awaiting inside.
pub struct InMemoryTodoStorage {
    inner: Mutex<Inner>,
}

impl InMemoryTodoStorage {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner { todos: BTreeMap::new(), next_id: 1 }) }
    }
}

impl Default for InMemoryTodoStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TodoStorage for InMemoryTodoStorage {
    async fn list_all(&self) -> StorageResult<Vec<Todo>> {
        let inner = self.inner.lock().await;
        let mut todos: Vec<Todo> = inner.todos.values().cloned().collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(todos)
    }

    async fn get_by_id(&self, id: i64) -> StorageResult<Option<Todo>> {
        let inner = self.inner.lock().await;
        Ok(inner.todos.get(&id).cloned())
    }

    async fn create(&self, data: TodoCreate) -> StorageResult<Todo> {
        let mut inner = self.inner.lock().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let todo = Todo { id, title: data.title, completed: false, created_at: Utc::now() };
        inner.todos.insert(id, todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: i64, patch: TodoUpdate) -> StorageResult<Option<Todo>> {
        let mut inner = self.inner.lock().await;
        let Some(todo) = inner.todos.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            todo.title = title;
        }
        if let Some(completed) = patch.completed {
            todo.completed = completed;
        }
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: i64) -> StorageResult<bool> {
        let mut inner = self.inner.lock().await;
        Ok(inner.todos.remove(&id).is_some())
    }

    async fn mark_all_complete(&self) -> StorageResult<u64> {
        let mut inner = self.inner.lock().await;
        let mut affected = 0;
        for todo in inner.todos.values_mut().filter(|t| !t.completed) {
            todo.completed = true;
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete_completed(&self) -> StorageResult<u64> {
        let mut inner = self.inner.lock().await;
        let before = inner.todos.len();
        inner.todos.retain(|_, t| !t.completed);
        Ok((before - inner.todos.len()) as u64)
    }

    async fn delete_all(&self) -> StorageResult<u64> {
        let mut inner = self.inner.lock().await;
        let count = inner.todos.len() as u64;
        inner.todos.clear();
        Ok(count)
    }
}
