use super::config::{LogFormat, LogLevel};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Dependencies whose own logging is capped at `warn`.
const QUIET_TARGETS: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls"];

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to create EnvFilter with '{filter}': {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("Failed to set global tracing subscriber: {0}")]
    AlreadyInitialized(String),
}

/// Default level first, then one `target=warn` directive per quiet target.
pub fn build_filter_string(level: LogLevel) -> String {
    let mut parts = Vec::with_capacity(QUIET_TARGETS.len() + 1);
    parts.push(level.as_str().to_string());
    parts.extend(QUIET_TARGETS.iter().map(|target| format!("{target}=warn")));
    parts.join(",")
}

/// Install the global subscriber. Diagnostics go to stderr; stdin carries
/// the input.
pub fn init_logging(level: LogLevel, format: LogFormat) -> Result<(), LoggingError> {
    let filter = build_filter_string(level);
    let env_filter = EnvFilter::try_new(&filter).map_err(|source| LoggingError::InvalidFilter {
        filter: filter.clone(),
        source,
    })?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .json()
                    .with_current_span(false),
            )
            .try_init(),
    };

    result.map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}
