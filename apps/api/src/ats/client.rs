//! Scoring contract (`{jobRole, resumeText}` in, `{ats_score, suggestions}` out) and
//! its HTTP adapter. Carried in `AppState` as `Arc<dyn AtsScorer>`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsRequest {
    pub job_role: String,
    pub resume_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub detail: String,
}

/// A well-formed scoring answer. Anything that does not deserialize into this is
/// treated as a failure as a whole; suggestions are never shown partially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsReport {
    pub ats_score: f64,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Scoring service returned status {0}")]
    Status(u16),

    #[error("Malformed scoring response: {0}")]
    Malformed(String),

    #[error("Scoring service failed: {0}")]
    Service(String),
}

#[async_trait]
pub trait AtsScorer: Send + Sync {
    async fn score(&self, request: &AtsRequest) -> Result<AtsReport, ScoringError>;
}

/// Talks to a deployed `/ai/ats` endpoint.
pub struct RemoteScorer {
    client: Client,
    url: String,
}

impl RemoteScorer {
    pub fn new(base_url: &str) -> Result<Self, ScoringError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(120)).build()?,
            url: format!("{}/ai/ats", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl AtsScorer for RemoteScorer {
    async fn score(&self, request: &AtsRequest) -> Result<AtsReport, ScoringError> {
        let response = self.client.post(&self.url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoringError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ScoringError::Malformed(e.to_string()))
    }
}
