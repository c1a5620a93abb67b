//! Enrichment contract (`{type, payload}` in, `{result}` out) and its HTTP adapter.
//!
//! `AppState` carries an `Arc<dyn Enricher>`; the orchestrator never knows whether the
//! rewriting happens over the network or in-process.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentKind {
    Summary,
    Skills,
    Project,
    Experience,
    Achievement,
}

impl EnrichmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EnrichmentKind::Summary => "summary",
            EnrichmentKind::Skills => "skills",
            EnrichmentKind::Project => "project",
            EnrichmentKind::Experience => "experience",
            EnrichmentKind::Achievement => "achievement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRequest {
    #[serde(rename = "type")]
    pub kind: EnrichmentKind,
    pub payload: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichmentResponse {
    #[serde(default)]
    pub result: Option<String>,
}

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Enrichment service returned status {0}")]
    Status(u16),

    #[error("Malformed enrichment response: {0}")]
    Malformed(String),

    #[error("Enrichment service failed: {0}")]
    Service(String),
}

/// Rewrites one free-text field. `Ok(None)` means the service had nothing to offer.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn improve(&self, request: &EnrichmentRequest) -> Result<Option<String>, EnrichmentError>;
}

/// Talks to a deployed `/ai/improve` endpoint.
pub struct RemoteEnricher {
    client: Client,
    url: String,
}

impl RemoteEnricher {
    pub fn new(base_url: &str) -> Result<Self, EnrichmentError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(60)).build()?,
            url: format!("{}/ai/improve", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl Enricher for RemoteEnricher {
    async fn improve(&self, request: &EnrichmentRequest) -> Result<Option<String>, EnrichmentError> {
        let response = self.client.post(&self.url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: EnrichmentResponse = serde_json::from_str(&body)
            .map_err(|e| EnrichmentError::Malformed(e.to_string()))?;

        Ok(parsed.result.filter(|r| !r.trim().is_empty()))
    }
}
