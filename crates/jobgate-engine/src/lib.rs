//! Client for the external job scraping engine.
//!
//! The gateway never scrapes by itself. It hands the filtered parameters to
//! an engine behind the [`ScrapeEngine`] trait and gets tabular rows back.
//! [`EngineClient`] talks to an out-of-process engine over HTTP.

pub mod client;
pub mod error;
pub mod table;

use async_trait::async_trait;
use jobgate_models::{ScrapeRequest, ScrapeResult};

pub use client::{EngineClient, EngineClientConfig};
pub use error::{EngineError, EngineResult};
pub use table::EngineTable;

/// A job scraping engine.
///
/// One call per request, run to completion. Implementations must not retry.
#[async_trait]
pub trait ScrapeEngine: Send + Sync {
    /// Run a scrape with exactly the parameters present in `request`.
    async fn scrape(&self, request: &ScrapeRequest) -> EngineResult<ScrapeResult>;

    /// Whether the engine is reachable.
    async fn health_check(&self) -> bool {
        true
    }
}
