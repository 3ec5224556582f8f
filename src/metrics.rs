//! Request timing as an explicit middleware layer.
//!
//! Each request is measured once, labeled by method, matched route, the
//! dataset segment of the path, and response status. Composed onto the
//! router in one place instead of wrapping individual handlers.

use std::time::Instant;

use axum::{extract::MatchedPath, extract::Request, middleware::Next, response::Response};
use tracing::info;

pub async fn track_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let dataset = request
        .uri()
        .path()
        .trim_start_matches('/')
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string);

    let start = Instant::now();
    let response = next.run(request).await;

    info!(
        %method,
        route = route.as_str(),
        dataset = dataset.as_deref().unwrap_or("-"),
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request completed"
    );

    response
}
