//! Axum HTTP gateway in front of the job scraping engine.
//!
//! This crate provides:
//! - Shared-secret bearer token gate for `/scrape`
//! - Allow-list filtering of scrape parameters
//! - JSON-safe job rows (NaN and null timestamps become `null`)
//! - Health, readiness and Prometheus endpoints

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use auth::{authorize, AuthOutcome};
pub use config::{AccessConfig, ApiConfig, LogLevel, LogSettings};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
