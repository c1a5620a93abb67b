use async_trait::async_trait;
use tracing::{debug, warn};

use crate::ai::prompts::{
    build_ats_prompt, build_improve_prompt, ATS_TEMPERATURE, IMPROVE_TEMPERATURE,
};
use crate::ats::{AtsReport, AtsRequest, AtsScorer, ScoringError};
use crate::enrichment::{Enricher, EnrichmentError, EnrichmentRequest};
use crate::llm_client::{LlmClient, LlmError};

/// In-process AI service: the same contracts as the remote endpoints, answered by
/// calling the model directly. Also backs the `/ai/*` routes.
#[derive(Clone)]
pub struct LlmAi {
    llm: LlmClient,
}

impl LlmAi {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Enricher for LlmAi {
    async fn improve(&self, request: &EnrichmentRequest) -> Result<Option<String>, EnrichmentError> {
        let prompt = build_improve_prompt(request.kind, &request.payload);
        match self.llm.complete(&prompt, IMPROVE_TEMPERATURE).await {
            Ok(text) => {
                debug!("Improved {} ({} chars)", request.kind.as_str(), text.len());
                Ok(Some(text))
            }
            Err(LlmError::EmptyContent) => Ok(None),
            Err(e) => {
                warn!("Improve '{}' failed: {e}", request.kind.as_str());
                Err(EnrichmentError::Service(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl AtsScorer for LlmAi {
    async fn score(&self, request: &AtsRequest) -> Result<AtsReport, ScoringError> {
        let prompt = build_ats_prompt(&request.job_role, &request.resume_text);
        self.llm
            .complete_json::<AtsReport>(&prompt, ATS_TEMPERATURE)
            .await
            .map_err(|e| ScoringError::Service(e.to_string()))
    }
}
