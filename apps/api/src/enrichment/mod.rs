// Enrichment: optional rewriting of summary, skills and item descriptions.
// Failures never leave this module; callers always get a usable model back.

pub mod client;
pub mod orchestrator;

pub use client::{
    Enricher, EnrichmentError, EnrichmentKind, EnrichmentRequest, EnrichmentResponse,
    RemoteEnricher,
};
pub use orchestrator::{enrich, EnrichmentSummary};
