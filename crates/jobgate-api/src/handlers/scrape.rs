//! Scrape handler.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use jobgate_models::{adapt, normalize, NormalizedJob};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Successful scrape response.
#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub count: usize,
    pub jobs: Vec<NormalizedJob>,
}

/// Forward the allow-listed parameters to the engine and return its rows.
pub async fn scrape(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<ScrapeResponse>> {
    let request = adapt(&body).map_err(|e| {
        warn!("Rejected scrape payload: {}", e);
        ApiError::from(e)
    })?;

    let params = serde_json::Value::Object(request.to_params());
    debug!("Scraping parameters: {}", params);

    info!("Starting job scrape with {} parameters", request.len());
    if let Some(term) = &request.search_term {
        info!("Search term: {}", display_value(term));
    }
    if let Some(location) = &request.location {
        info!("Location: {}", display_value(location));
    }

    let jobs = match state.engine.scrape(&request).await {
        Ok(jobs) => jobs,
        Err(e) => {
            error!("Failed to scrape jobs: {}", e);
            metrics::record_scrape("error", 0);
            return Err(ApiError::from(e));
        }
    };

    info!("Successfully scraped {} jobs", jobs.len());
    metrics::record_scrape("success", jobs.len());

    let jobs = normalize(jobs);

    Ok(Json(ScrapeResponse {
        success: true,
        count: jobs.len(),
        jobs,
    }))
}

/// Strings without their JSON quotes, everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
