//! Shared data models for the job scraping gateway.
//!
//! This crate provides Serde-serializable types for:
//! - The allow-listed scrape request forwarded to the engine
//! - Job rows returned by the engine
//! - Normalization of "no data" cells into JSON nulls

pub mod job;
pub mod normalize;
pub mod request;

// Re-export common types
pub use job::{CellValue, Job, NormalizedJob, ScrapeResult};
pub use normalize::{is_missing, normalize, normalize_job};
pub use request::{adapt, PayloadError, ScrapeRequest, ALLOWED_PARAMS};
