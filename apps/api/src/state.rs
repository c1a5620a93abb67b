use std::sync::Arc;

use crate::ai::LlmAi;
use crate::ats::AtsScorer;
use crate::enrichment::Enricher;
use crate::export::ExportSink;
use crate::render::TemplateSource;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub templates: Arc<dyn TemplateSource>,
    /// Pluggable enrichment service. Remote when AI_SERVICE_URL is set, otherwise in-process.
    pub enricher: Arc<dyn Enricher>,
    /// Pluggable scoring service, chosen the same way as `enricher`.
    pub scorer: Arc<dyn AtsScorer>,
    pub exporter: Arc<dyn ExportSink>,
    /// Backs the `/ai/*` routes; `None` when LLM_API_KEY is not set.
    pub ai: Option<Arc<LlmAi>>,
}
