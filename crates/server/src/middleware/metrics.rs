//! Prometheus metrics collection middleware
//!
//! Records `http_requests_total` and `http_request_duration_seconds` per
//! method, path and status. Extraction fallbacks are counted by the
//! assessment handlers.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Collapse session ids in paths to `:id` to keep label cardinality bounded.
fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|seg| if uuid::Uuid::try_parse(seg).is_ok() { ":id" } else { seg })
        .collect::<Vec<_>>()
        .join("/")
}

pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method, "path" => path)
        .record(elapsed);

    response
}
