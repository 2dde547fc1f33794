use std::path::Path;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::CorsConfig;
use crate::error::AppError;
use crate::middleware;
use crate::routes;
use crate::state::AppState;
use crate::types::ErrorResponse;

/// Request bodies are a title and a flag; 1 MiB is plenty.
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Assembles the full application router: API routes, health, middleware stack, CORS and,
/// outside debug mode, the companion frontend's static files.
pub fn build_app(state: AppState) -> Router {
    let cfg = state.config.clone();

    let mut app = Router::new()
        .route("/health", get(routes::health::health))
        .nest("/api", routes::api_router());

    // Static file service with SPA fallback; only in production and only if it was built
    let static_dir = Path::new(&cfg.static_files.dir);
    if !cfg.app.debug && static_dir.is_dir() {
        tracing::info!("Serving static files from {}", static_dir.display());
        let index = static_dir.join("index.html");
        let static_service = ServeDir::new(static_dir)
            .append_index_html_on_directories(true)
            .not_found_service(ServeFile::new(index));
        app = app.fallback_service(static_service);
    } else {
        app = app.fallback(not_found);
    }

    app.with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(from_fn(middleware::timing::request_timing_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(middleware::security_headers::security_headers_middleware))
        .layer(cors_layer(&cfg.cors))
}

/// A panic anywhere below the router becomes the generic 500 instead of a dropped connection.
fn handle_panic(payload: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::Internal(anyhow::anyhow!("handler panicked: {}", message)).into_response()
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse { detail: "Not Found".to_string(), error_code: "NOT_FOUND".to_string() }),
    )
}

pub fn cors_layer(cfg: &CorsConfig) -> CorsLayer {
    if cfg.allow_origins.iter().any(|o| o == "*") {
        // Wildcard origins cannot be combined with credentials
        return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = cfg
        .allow_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o.trim()) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}: {}", o, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(cfg.allow_credentials)
}
