//! JSON-safe normalization of engine rows.

use crate::job::{CellValue, Job, NormalizedJob};

/// Whether a cell is a "no data" sentinel: a NaN float or a null timestamp.
pub fn is_missing(value: &CellValue) -> bool {
    match value {
        CellValue::Float(f) => f.is_nan(),
        CellValue::Timestamp(ts) => ts.is_none(),
        _ => false,
    }
}

/// Replace every "no data" cell of one row with an explicit null.
pub fn normalize_job(job: Job) -> NormalizedJob {
    job.into_iter()
        .map(|(name, value)| {
            if is_missing(&value) {
                (name, CellValue::Null)
            } else {
                (name, value)
            }
        })
        .collect()
}

/// Normalize a whole result set. Row order and count are preserved and
/// applying it twice gives the same rows as applying it once.
pub fn normalize(jobs: Vec<Job>) -> Vec<NormalizedJob> {
    jobs.into_iter().map(normalize_job).collect()
}
