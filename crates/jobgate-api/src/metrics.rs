//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "jobgate_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "jobgate_http_request_duration_seconds";
    pub const AUTH_OUTCOMES_TOTAL: &str = "jobgate_auth_outcomes_total";
    pub const SCRAPES_TOTAL: &str = "jobgate_scrapes_total";
    pub const SCRAPED_JOBS_TOTAL: &str = "jobgate_scraped_jobs_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record the auth gate's decision.
pub fn record_auth_outcome(outcome: &'static str) {
    counter!(names::AUTH_OUTCOMES_TOTAL, "outcome" => outcome).increment(1);
}

/// Record a finished engine call.
pub fn record_scrape(status: &'static str, jobs: usize) {
    counter!(names::SCRAPES_TOTAL, "status" => status).increment(1);
    counter!(names::SCRAPED_JOBS_TOTAL).increment(jobs as u64);
}

/// Middleware recording request count and latency per route.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let start = Instant::now();
    let method = request.method().to_string();
    // Route templates keep label cardinality bounded.
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}
