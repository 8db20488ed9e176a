use super::envelope::decode_subscription_event;
use crate::domain::{ForwarderError, LogBatch};
use crate::normalizer::EventNormalizer;
use crate::sender::{IngestClient, IngestStatus};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

/// Failures listed individually before the rest are summarized.
const MAX_REPORTED_FAILURES: usize = 5;

/// Normalizes decoded batches and hands them to an ingest client.
#[derive(Debug)]
pub struct BatchDriver<C> {
    client: C,
    dataset: String,
    normalizer: EventNormalizer,
}

impl<C: IngestClient> BatchDriver<C> {
    pub fn new(client: C, dataset: impl Into<String>, normalizer: EventNormalizer) -> Self {
        Self {
            client,
            dataset: dataset.into(),
            normalizer,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Normalize `batch` and ingest it with a single call.
    pub async fn process(&self, batch: &LogBatch) -> Result<IngestStatus, ForwarderError> {
        if batch.is_empty() {
            debug!(
                "Batch from {} has no log events, skipping",
                batch.metadata.log_group
            );
            return Ok(IngestStatus::default());
        }

        let events = self.normalizer.normalize_batch(batch);
        debug!(
            log_group = %batch.metadata.log_group,
            log_stream = %batch.metadata.log_stream,
            "Normalized {} events",
            events.len()
        );

        let status = self.client.ingest(&self.dataset, &events).await?;

        if status.failed > 0 {
            warn!(
                "{} of {} events were rejected by dataset {}",
                status.failed,
                events.len(),
                self.dataset
            );
            for failure in status.failures.iter().take(MAX_REPORTED_FAILURES) {
                warn!(
                    timestamp = failure.timestamp.as_deref().unwrap_or("-"),
                    "Ingest failure: {}", failure.error
                );
            }
        }

        info!("ingested {} of {} events", status.ingested, events.len());
        Ok(status)
    }

    /// Decode one raw subscription event, then [`process`](Self::process) it.
    pub async fn handle_subscription_event(
        &self,
        raw: &str,
    ) -> Result<IngestStatus, ForwarderError> {
        let batch = decode_subscription_event(raw)?;
        self.process(&batch).await
    }

    /// Handle one subscription event per non-blank line until EOF. Stops at
    /// the first error; returns the number of events handled.
    pub async fn forward_lines<R>(&self, reader: R) -> Result<usize, ForwarderError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        let mut handled = 0;

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            self.handle_subscription_event(&line).await?;
            handled += 1;
        }

        Ok(handled)
    }
}
