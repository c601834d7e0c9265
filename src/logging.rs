use crate::logging::error::LoggingError;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub mod error;

/// Sends `tracing` output to `log_path`. The terminal belongs to the UI, so
/// nothing is written to stdout or stderr.
///
/// `RUST_LOG` takes precedence over `filter`; both default to `info`.
pub fn setup(log_path: &Path, filter: Option<&str>) -> Result<(), LoggingError> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let env_filter = build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok(), filter)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(env_filter)
        .try_init()?;
    Ok(())
}

fn build_filter(env: Option<String>, configured: Option<&str>) -> Result<EnvFilter, LoggingError> {
    let directives = match env.as_deref() {
        Some(directives) if !directives.is_empty() => directives,
        _ => configured.unwrap_or_default(),
    };
    Ok(EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse(directives)?)
}
