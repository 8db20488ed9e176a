use super::serialization::{BatchSerializer, CONTENT_TYPE_JSON};
use crate::domain::NormalizedEvent;
use reqwest::header::{AUTHORIZATION, CONTENT_ENCODING, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

const ORG_ID_HEADER: &str = "x-axiom-org-id";

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl IngestError {
    /// Transport failures and server-side errors may succeed on redelivery.
    pub fn is_retryable(&self) -> bool {
        match self {
            IngestError::Network(_) => true,
            IngestError::HttpError { status, .. } => *status == 429 || *status >= 500,
            IngestError::InvalidConfiguration(_)
            | IngestError::Serialization(_)
            | IngestError::InvalidResponse(_) => false,
        }
    }
}

/// Per-event rejection reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestFailure {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub error: String,
}

/// Outcome of one ingest call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestStatus {
    pub ingested: u64,
    pub failed: u64,
    #[serde(default)]
    pub failures: Vec<IngestFailure>,
    #[serde(default)]
    pub processed_bytes: u64,
}

/// Delivers normalized events to a dataset.
pub trait IngestClient: Send + Sync {
    fn ingest(
        &self,
        dataset: &str,
        events: &[NormalizedEvent],
    ) -> impl Future<Output = Result<IngestStatus, IngestError>> + Send;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `https://api.axiom.co`.
    pub url: String,
    pub token: Option<String>,
    pub org_id: Option<String>,
    pub timeout: Duration,
    pub connection_timeout: Duration,
    pub user_agent: String,
    pub enable_compression: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "https://api.axiom.co".to_string(),
            token: None,
            org_id: None,
            timeout: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
            user_agent: format!("cloudwatch-log-forwarder/{}", env!("CARGO_PKG_VERSION")),
            enable_compression: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub events_sent: u64,
    pub average_response_time: Duration,
}

#[derive(Debug, Default)]
pub struct ClientStats {
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
    events_sent: AtomicU64,
    total_response_time: AtomicU64,
}

impl ClientStats {
    pub fn record_request(&self, success: bool, events: usize, response_time: Duration) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_response_time
            .fetch_add(response_time.as_millis() as u64, Ordering::Relaxed);

        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
            self.events_sent.fetch_add(events as u64, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// reqwest-backed client for the dataset ingest endpoint.
#[derive(Debug, Clone)]
pub struct HttpIngestClient {
    client: Client,
    config: ClientConfig,
    base_url: Url,
    serializer: BatchSerializer,
    stats: Arc<ClientStats>,
}

impl HttpIngestClient {
    pub fn new(config: ClientConfig) -> Result<Self, IngestError> {
        let base_url: Url = config
            .url
            .parse()
            .map_err(|e| IngestError::InvalidConfiguration(format!("Invalid URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(IngestError::InvalidConfiguration(format!(
                "URL cannot be used as a base: {base_url}"
            )));
        }

        let mut default_headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                IngestError::InvalidConfiguration("Token contains invalid characters".to_string())
            })?;
            default_headers.insert(AUTHORIZATION, value);
        }
        if let Some(org_id) = &config.org_id {
            let value = HeaderValue::from_str(org_id).map_err(|_| {
                IngestError::InvalidConfiguration("Org ID contains invalid characters".to_string())
            })?;
            default_headers.insert(ORG_ID_HEADER, value);
        }

        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connection_timeout)
            .user_agent(&config.user_agent)
            .default_headers(default_headers)
            .build()
            .map_err(|e| {
                IngestError::InvalidConfiguration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            config,
            base_url,
            serializer: BatchSerializer::new(),
            stats: Arc::new(ClientStats::default()),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `{url}/v1/datasets/{dataset}/ingest`, with the dataset percent-encoded.
    pub fn ingest_url(&self, dataset: &str) -> Result<Url, IngestError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                IngestError::InvalidConfiguration("URL cannot be used as a base".to_string())
            })?
            .pop_if_empty()
            .extend(["v1", "datasets", dataset, "ingest"]);
        Ok(url)
    }

    fn prepare_payload(&self, events: &[NormalizedEvent]) -> Result<Vec<u8>, IngestError> {
        let payload = if self.config.enable_compression {
            self.serializer.serialize_compressed(events)
        } else {
            self.serializer.serialize_json_array(events)
        };
        payload.map_err(|e| IngestError::Serialization(e.to_string()))
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        if self.config.enable_compression {
            headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
        }
        headers
    }

    pub fn connection_stats(&self) -> ConnectionStats {
        let total_requests = self.stats.total_requests.load(Ordering::Relaxed);
        let total_response_time = self.stats.total_response_time.load(Ordering::Relaxed);

        let average_response_time = total_response_time
            .checked_div(total_requests)
            .map_or(Duration::ZERO, Duration::from_millis);

        ConnectionStats {
            total_requests,
            successful_requests: self.stats.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.stats.failed_requests.load(Ordering::Relaxed),
            events_sent: self.stats.events_sent.load(Ordering::Relaxed),
            average_response_time,
        }
    }
}

impl IngestClient for HttpIngestClient {
    async fn ingest(
        &self,
        dataset: &str,
        events: &[NormalizedEvent],
    ) -> Result<IngestStatus, IngestError> {
        if events.is_empty() {
            return Ok(IngestStatus::default());
        }

        let url = self.ingest_url(dataset)?;
        let payload = self.prepare_payload(events)?;
        let bytes_sent = payload.len();

        debug!(
            "Sending {} events ({} bytes) to {}",
            events.len(),
            bytes_sent,
            url
        );

        let start = Instant::now();
        let response = match self
            .client
            .post(url)
            .headers(self.build_headers())
            .body(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                self.stats.record_request(false, events.len(), start.elapsed());
                return Err(IngestError::Network(e));
            }
        };

        let status = response.status();
        let body = response.bytes().await?;
        let latency = start.elapsed();
        self.stats
            .record_request(status.is_success(), events.len(), latency);

        if !status.is_success() {
            let message = String::from_utf8_lossy(&body).into_owned();
            warn!("Ingest into {} failed: HTTP {}", dataset, status.as_u16());
            return Err(IngestError::HttpError {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice::<IngestStatus>(&body)
            .map_err(|e| IngestError::InvalidResponse(format!("Undecodable ingest status: {e}")))
    }
}
