pub mod config;
pub mod driver;
pub mod envelope;
pub mod logging;

pub use config::{Config, ConfigError, LogFormat, LogLevel};
pub use driver::BatchDriver;
pub use envelope::{EnvelopeError, decode_payload, decode_subscription_event};
pub use logging::{LoggingError, init_logging};

use crate::domain::ForwarderError;
use crate::normalizer::EventNormalizer;
use crate::sender::HttpIngestClient;
use anyhow::Context;
use tokio::io::BufReader;
use tracing::info;

pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Wire a validated configuration into a driver backed by the HTTP client.
pub fn build_driver(config: &Config) -> Result<BatchDriver<HttpIngestClient>, ForwarderError> {
    config.validate()?;
    let client = HttpIngestClient::new(config.client_config())?;
    let normalizer = EventNormalizer::new(config.matcher_options());
    Ok(BatchDriver::new(client, config.dataset.clone(), normalizer))
}

// Main entry point for the application
pub async fn main() -> anyhow::Result<()> {
    let config = Config::load(std::env::args_os()).context("failed to load configuration")?;
    init_logging(config.log_level, config.log_format).context("failed to initialize logging")?;

    info!("Starting cloudwatch-log-forwarder v{}", get_version());
    info!(
        "Configuration: dataset={}, url={}, compression={}, json_max_depth={:?}",
        config.dataset, config.url, config.enable_compression, config.json_max_depth
    );

    let driver = build_driver(&config).context("failed to build ingest pipeline")?;
    let handled = driver
        .forward_lines(BufReader::new(tokio::io::stdin()))
        .await
        .context("failed to forward subscription events")?;

    let stats = driver.client().connection_stats();
    info!(
        "Handled {} subscription events ({} requests, {} events sent)",
        handled, stats.total_requests, stats.events_sent
    );
    Ok(())
}
