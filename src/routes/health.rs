use axum::{extract::State, Json};

use crate::state::AppState;
use crate::types::HealthResponse;

// Liveness only; does not touch storage.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        app_name: state.config.app.name.clone(),
        version: state.config.app.version.clone(),
    })
}
