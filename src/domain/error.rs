use thiserror::Error;

/// Top-level error type for one forwarder invocation.
#[derive(Error, Debug)]
pub enum ForwarderError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::app::ConfigError),

    #[error("Envelope error: {0}")]
    Envelope(#[from] crate::app::envelope::EnvelopeError),

    #[error("Ingestion error: {0}")]
    Ingest(#[from] crate::sender::IngestError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForwarderError {
    /// Whether the invocation could succeed if the trigger redelivers it.
    pub fn is_retryable(&self) -> bool {
        match self {
            ForwarderError::Ingest(e) => e.is_retryable(),
            ForwarderError::Io(_) => true,
            ForwarderError::Config(_) | ForwarderError::Envelope(_) => false,
        }
    }
}
