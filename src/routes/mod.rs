//! HTTP route handlers.
//!
//! - `health`: liveness endpoint with app name and version
//! - `todos`: CRUD, stats and bulk operations under `/api`

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

pub mod health;
pub mod todos;

/// Routes mounted under `/api`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/todos", get(todos::list_todos).post(todos::create_todo))
        .route("/todos/stats", get(todos::todo_stats))
        .route("/todos/bulk/mark-complete", post(todos::mark_all_complete))
        .route("/todos/bulk/completed", delete(todos::delete_completed))
        .route("/todos/bulk/all", delete(todos::delete_all))
        .route(
            "/todos/{id}",
            get(todos::get_todo).put(todos::update_todo).delete(todos::delete_todo),
        )
}
