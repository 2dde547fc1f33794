//! Request/response logging with a processing-time header.

use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

pub const PROCESS_TIME_HEADER: &str = "x-process-time";

/// Logs each request and its outcome, and reports the handling time in seconds
/// via `X-Process-Time`.
pub async fn request_timing_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();
    tracing::info!("Request: {} {}", method, path);

    let mut res = next.run(req).await;

    let elapsed = start.elapsed().as_secs_f64();
    tracing::info!("Response: {} for {} {} in {:.3}s", res.status().as_u16(), method, path, elapsed);
    if let Ok(value) = HeaderValue::from_str(&format!("{:.6}", elapsed)) {
        res.headers_mut().insert(HeaderName::from_static(PROCESS_TIME_HEADER), value);
    }
    res
}
