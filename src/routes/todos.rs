use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    state::AppState,
    types::{BulkActionResponse, Todo, TodoCreate, TodoStats, TodoUpdate},
};

fn path_id(path: Result<Path<i64>, PathRejection>) -> AppResult<i64> {
    path.map(|Path(id)| id)
        .map_err(|e| AppError::Validation(format!("Todo ID must be an integer: {}", e.body_text())))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(v)| v).map_err(|e| AppError::UnprocessableBody(e.body_text()))
}

pub async fn list_todos(State(state): State<AppState>) -> AppResult<Json<Vec<Todo>>> {
    Ok(Json(state.service.list_all().await?))
}

pub async fn get_todo(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Todo>> {
    let id = path_id(path)?;
    Ok(Json(state.service.get_by_id(id).await?))
}

pub async fn create_todo(
    State(state): State<AppState>,
    body: Result<Json<TodoCreate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Todo>)> {
    let data = json_body(body)?;
    let todo = state.service.create(data).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<TodoUpdate>, JsonRejection>,
) -> AppResult<Json<Todo>> {
    let id = path_id(path)?;
    let patch = json_body(body)?;
    Ok(Json(state.service.update(id, patch).await?))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<StatusCode> {
    let id = path_id(path)?;
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn todo_stats(State(state): State<AppState>) -> AppResult<Json<TodoStats>> {
    Ok(Json(state.service.stats().await?))
}

pub async fn mark_all_complete(State(state): State<AppState>) -> AppResult<Json<BulkActionResponse>> {
    Ok(Json(state.service.mark_all_complete().await?))
}

pub async fn delete_completed(State(state): State<AppState>) -> AppResult<Json<BulkActionResponse>> {
    Ok(Json(state.service.delete_completed().await?))
}

pub async fn delete_all(State(state): State<AppState>) -> AppResult<Json<BulkActionResponse>> {
    Ok(Json(state.service.delete_all().await?))
}
