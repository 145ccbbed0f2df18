//! Tracing subscriber setup.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogSettings;

/// Filter built from the configured level. `RUST_LOG` wins when set.
pub fn build_filter(settings: &LogSettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(settings.level.as_filter()))
}

/// Open the log file for appending, creating it if needed.
pub fn open_log_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber: stdout plus an optional file sink.
pub fn init_tracing(settings: &LogSettings) -> anyhow::Result<()> {
    let stdout_layer = if settings.json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer()
            .with_ansi(true)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed()
    };

    let file_layer = if settings.to_file {
        let file = open_log_file(&settings.file_path)?;
        Some(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .with(build_filter(settings))
        .try_init()?;

    Ok(())
}
