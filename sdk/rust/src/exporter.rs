//! JSON batch delivery to a tracekeep ingestion endpoint
//!
//! One `POST` per batch, body is a JSON array of [`Span`]. Only the
//! configured status (202 by default) counts as success. Failures are
//! returned to the caller, never retried here.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::convert::{ConvertConfig, RawSpan, SpanConverter};
use crate::error::ExportError;
use crate::span::Span;

pub const DEFAULT_ACCEPTED_STATUS: u16 = 202;
pub const DEFAULT_EXPORT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Full URL of the ingestion endpoint, e.g. `http://host:5390/api/v2/spans`
    pub endpoint: String,
    pub accepted_status: u16,
    pub timeout: Duration,
    pub convert: ConvertConfig,
}

impl ExporterConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            accepted_status: DEFAULT_ACCEPTED_STATUS,
            timeout: Duration::from_secs(DEFAULT_EXPORT_TIMEOUT_SECS),
            convert: ConvertConfig::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_accepted_status(mut self, status: u16) -> Self {
        self.accepted_status = status;
        self
    }

    pub fn with_convert(mut self, convert: ConvertConfig) -> Self {
        self.convert = convert;
        self
    }
}

/// Ships span batches over a single reused HTTP client.
#[derive(Debug, Clone)]
pub struct BatchExporter {
    client: reqwest::Client,
    converter: SpanConverter,
    endpoint: String,
    accepted_status: u16,
}

impl BatchExporter {
    pub fn new(config: ExporterConfig) -> Result<Self, ExportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("tracekeep/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ExportError::ClientBuild)?;

        tracing::debug!(
            endpoint = %config.endpoint,
            timeout_ms = config.timeout.as_millis() as u64,
            "Span exporter initialized"
        );

        Ok(Self {
            client,
            converter: SpanConverter::new(config.convert),
            endpoint: config.endpoint,
            accepted_status: config.accepted_status,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send canonical spans. An empty batch sends nothing.
    pub async fn export(&self, spans: &[Span]) -> Result<(), ExportError> {
        if spans.is_empty() {
            return Ok(());
        }

        let payload = serde_json::to_vec(spans)?;
        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(ExportError::Request)?;

        let status = resp.status().as_u16();
        if status != self.accepted_status {
            tracing::debug!(
                endpoint = %self.endpoint,
                status,
                expected = self.accepted_status,
                "Span batch rejected"
            );
            return Err(ExportError::UnexpectedStatus {
                status,
                endpoint: self.endpoint.clone(),
            });
        }

        tracing::trace!(count = spans.len(), "Span batch exported");
        Ok(())
    }

    /// Convert, filter and send raw spans.
    pub async fn export_raw(&self, raw: &[RawSpan]) -> Result<(), ExportError> {
        let spans = self.converter.convert_batch(raw);
        self.export(&spans).await
    }

    /// Nothing is buffered, so there is nothing to flush.
    pub async fn shutdown(&self) -> Result<(), ExportError> {
        Ok(())
    }
}
