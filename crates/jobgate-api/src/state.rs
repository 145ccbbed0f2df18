//! Application state.

use std::sync::Arc;

use jobgate_engine::ScrapeEngine;

use crate::config::ApiConfig;

/// Shared application state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub engine: Arc<dyn ScrapeEngine>,
}

impl AppState {
    /// Create state around an existing engine.
    pub fn new(config: ApiConfig, engine: Arc<dyn ScrapeEngine>) -> Self {
        Self {
            config: Arc::new(config),
            engine,
        }
    }
}
