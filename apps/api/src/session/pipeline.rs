//! Session pipeline: the operations that move a session from form to preview and beyond.
//!
//! Generate is strictly ordered: validate → extract → enrich → render → retain.
//! Locks are taken around the synchronous steps only; every network await runs unlocked.

use serde::Serialize;
use tracing::{info, warn};

use crate::ats::{check, AtsScorer, CheckError, CheckOutcome};
use crate::enrichment::{enrich, Enricher, EnrichmentSummary};
use crate::errors::AppError;
use crate::export::{export_preview, ExportSink, ExportedFile};
use crate::form::extract::extract;
use crate::form::validation::validate;
use crate::render::{render_document, TemplateSource};
use crate::session::context::Session;

#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutcome {
    pub template: String,
    pub enrichment: EnrichmentSummary,
}

/// Runs the full generation pipeline for one session.
///
/// Steps:
/// 1. validate() → inline errors updated; stop here unless valid
/// 2. extract() → DocumentModel
/// 3. enrich() → best-effort rewrites, all settled before rendering
/// 4. render_document() with the template selected when the markup is stored
/// 5. retain model + markup for template switches, previews and downloads
pub async fn generate(
    session: &Session,
    enricher: &dyn Enricher,
    templates: &dyn TemplateSource,
) -> Result<GenerateOutcome, AppError> {
    let _guard = session.try_begin_generation().ok_or(AppError::Busy)?;

    // Step 1: Validate
    let form = {
        let mut state = session.write().await;
        let report = validate(&state.form);
        state.field_errors.apply(&report);
        if !report.valid {
            info!(
                "Session {} failed validation: {} field errors, alert={}",
                session.id,
                report.errors.len(),
                report.alert.is_some()
            );
            return Err(AppError::InvalidForm(report));
        }
        state.form.clone()
    };

    // Step 2: Extract
    let mut model = extract(&form);

    // Step 3: Enrich
    let enrichment = enrich(&mut model, enricher).await;

    // Step 4 + 5: Render and retain. The template loads unlocked, so a switch may land
    // meanwhile; the markup is only stored if it matches the selection at that point.
    let mut template = session.read().await.template.clone();
    loop {
        let content = templates.load(&template).await?;
        let mut state = session.write().await;
        if state.template != template {
            template = state.template.clone();
            continue;
        }
        state.markup = Some(render_document(&content, &model));
        state.model = Some(model);
        state.ats = None;
        break;
    }

    info!(
        "Session {} generated with template '{}' ({}/{} fields enriched)",
        session.id, template, enrichment.applied, enrichment.attempted
    );

    Ok(GenerateOutcome {
        template,
        enrichment,
    })
}

/// Selects a template and, when a model is retained, re-renders it as-is.
/// Returns whether a re-render happened. An unknown template leaves the selection unchanged.
pub async fn select_template(
    session: &Session,
    name: &str,
    templates: &dyn TemplateSource,
) -> Result<bool, AppError> {
    let template = templates.load(name).await?;

    let mut state = session.write().await;
    state.template = name.to_string();
    let markup = state
        .model
        .as_ref()
        .map(|model| render_document(&template, model));
    let rerendered = markup.is_some();
    if rerendered {
        state.markup = markup;
    }

    info!(
        "Session {} switched to template '{}' (re-rendered: {})",
        session.id, name, rerendered
    );
    Ok(rerendered)
}

/// Scores the current preview. Precondition failures change nothing; a scoring
/// failure hides the previous report.
pub async fn run_ats(
    session: &Session,
    job_role: &str,
    scorer: &dyn AtsScorer,
) -> Result<CheckOutcome, AppError> {
    let markup = session.read().await.markup.clone();

    match check(markup.as_deref(), job_role, scorer).await {
        Ok(outcome) => {
            session.write().await.ats = Some(outcome.clone());
            Ok(outcome)
        }
        Err(CheckError::Failed) => {
            session.write().await.ats = None;
            warn!("Session {}: ATS report cleared after failure", session.id);
            Err(AppError::Scoring)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn download(session: &Session, sink: &dyn ExportSink) -> Result<ExportedFile, AppError> {
    let (markup, filename) = {
        let state = session.read().await;
        let filename = state
            .model
            .as_ref()
            .map(|m| m.export_filename())
            .unwrap_or_default();
        (state.markup.clone(), filename)
    };

    Ok(export_preview(sink, markup.as_deref(), &filename).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::ats::{AtsReport, AtsRequest, ScoringError, Suggestion};
    use crate::enrichment::{EnrichmentError, EnrichmentKind, EnrichmentRequest};
    use crate::export::{ExportError, PDF_CONTENT_TYPE};
    use crate::form::validation::FieldId;
    use crate::models::SectionKind;
    use crate::render::templates::memory::MemoryTemplates;

    /// Summary fails at the transport level; skills come back grouped.
    #[derive(Default)]
    struct FlakyEnricher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Enricher for FlakyEnricher {
        async fn improve(
            &self,
            request: &EnrichmentRequest,
        ) -> Result<Option<String>, EnrichmentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match request.kind {
                EnrichmentKind::Summary => Err(EnrichmentError::Status(503)),
                EnrichmentKind::Skills => Ok(Some("Languages: Rust, Go, Zig".to_string())),
                _ => Ok(None),
            }
        }
    }

    struct FixedScorer {
        fail: bool,
    }

    #[async_trait]
    impl AtsScorer for FixedScorer {
        async fn score(&self, _request: &AtsRequest) -> Result<AtsReport, ScoringError> {
            if self.fail {
                return Err(ScoringError::Status(500));
            }
            Ok(AtsReport {
                ats_score: 70.0,
                suggestions: vec![Suggestion {
                    title: "Keywords".to_string(),
                    detail: "Mention Kubernetes.".to_string(),
                }],
            })
        }
    }

    struct StaticSink;

    #[async_trait]
    impl ExportSink for StaticSink {
        async fn export(&self, _markup: &str, filename: &str) -> Result<ExportedFile, ExportError> {
            Ok(ExportedFile {
                filename: filename.to_string(),
                content_type: PDF_CONTENT_TYPE,
                bytes: b"%PDF".to_vec(),
            })
        }
    }

    fn templates() -> MemoryTemplates {
        MemoryTemplates::new(&[
            (
                "simple-ats",
                "<h1>{{FULL_NAME}}</h1><p>{{SUMMARY}}</p>{{SKILLS}}",
            ),
            ("modern", "<main><h2>{{FULL_NAME}}</h2>{{SKILLS}}</main>"),
        ])
    }

    async fn filled_session() -> Session {
        let session = Session::new();
        {
            let mut state = session.write().await;
            let form = &mut state.form;
            form.full_name = "Ada  Lovelace".to_string();
            form.email = "ada@example.com".to_string();
            form.phone = "0123456789".to_string();
            form.about = "I build compilers.".to_string();
            form.skills = "Languages: Rust, Go".to_string();
            let id = form.sections.groups(SectionKind::Education)[0].id;
            form.sections.set_field(id, "degree", "BSc".into()).unwrap();
            form.sections
                .set_field(id, "institute", "Cambridge".into())
                .unwrap();
            form.sections.set_field(id, "year", "2019-2023".into()).unwrap();
        }
        session
    }

    #[tokio::test]
    async fn test_invalid_form_stops_before_extraction() {
        let session = filled_session().await;
        session.write().await.form.phone = "12345".to_string();
        let enricher = FlakyEnricher::default();

        let err = generate(&session, &enricher, &templates()).await.unwrap_err();
        match err {
            AppError::InvalidForm(report) => {
                assert_eq!(report.first_invalid_field, Some(FieldId::Phone));
            }
            other => panic!("expected InvalidForm, got {other:?}"),
        }

        assert_eq!(enricher.calls.load(Ordering::SeqCst), 0);
        let state = session.read().await;
        assert!(state.markup.is_none());
        assert!(state.field_errors.get(FieldId::Phone).is_some());
        drop(state);
        assert!(!session.is_generating());
    }

    #[tokio::test]
    async fn test_enrichment_failure_is_isolated() {
        let session = filled_session().await;
        let enricher = FlakyEnricher::default();

        let outcome = generate(&session, &enricher, &templates()).await.unwrap();
        assert_eq!(outcome.template, "simple-ats");
        assert_eq!(outcome.enrichment.failed, 1);
        assert_eq!(outcome.enrichment.applied, 1);

        let state = session.read().await;
        let markup = state.markup.as_deref().unwrap();
        assert!(markup.contains("<p>I build compilers.</p>"));
        assert!(markup.contains("Zig"));
        assert!(state.field_errors.to_vec().is_empty());
    }

    #[tokio::test]
    async fn test_template_switch_rerenders_without_enrichment() {
        let session = filled_session().await;
        let enricher = FlakyEnricher::default();
        generate(&session, &enricher, &templates()).await.unwrap();
        let calls = enricher.calls.load(Ordering::SeqCst);

        // Edits after generating must not leak into a re-render.
        session.write().await.form.full_name = "Someone Else".to_string();

        let rerendered = select_template(&session, "modern", &templates())
            .await
            .unwrap();
        assert!(rerendered);
        assert_eq!(enricher.calls.load(Ordering::SeqCst), calls);

        let state = session.read().await;
        assert_eq!(state.template, "modern");
        let markup = state.markup.as_deref().unwrap();
        assert!(markup.starts_with("<main><h2>Ada  Lovelace</h2>"));
        assert!(markup.contains("Zig"));
    }

    /// Holds `load("simple-ats")` until released, so a switch can land mid-generate.
    struct GatedTemplates {
        inner: MemoryTemplates,
        gate: tokio::sync::Notify,
    }

    #[async_trait]
    impl TemplateSource for GatedTemplates {
        async fn load(&self, name: &str) -> Result<String, crate::render::TemplateError> {
            if name == "simple-ats" {
                self.gate.notified().await;
            }
            self.inner.load(name).await
        }

        async fn list(&self) -> Result<Vec<String>, crate::render::TemplateError> {
            self.inner.list().await
        }
    }

    #[tokio::test]
    async fn test_switch_during_generate_keeps_preview_in_sync() {
        let session = filled_session().await;
        let gated = GatedTemplates {
            inner: MemoryTemplates::new(&[
                ("simple-ats", "SIMPLE:{{FULL_NAME}}"),
                ("modern", "MODERN:{{FULL_NAME}}"),
            ]),
            gate: tokio::sync::Notify::new(),
        };
        let enricher = FlakyEnricher::default();

        let (generated, switched) = tokio::join!(generate(&session, &enricher, &gated), async {
            let switched = select_template(&session, "modern", &gated).await;
            gated.gate.notify_one();
            switched
        });
        generated.unwrap();
        switched.unwrap();

        let state = session.read().await;
        assert_eq!(state.template, "modern");
        assert_eq!(state.markup.as_deref(), Some("MODERN:Ada  Lovelace"));
    }

    #[tokio::test]
    async fn test_unknown_template_keeps_selection() {
        let session = Session::new();
        let result = select_template(&session, "fancy", &templates()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(session.read().await.template, "simple-ats");
    }

    #[tokio::test]
    async fn test_select_before_generate_only_records_choice() {
        let session = Session::new();
        assert!(!select_template(&session, "modern", &templates()).await.unwrap());
        let state = session.read().await;
        assert_eq!(state.template, "modern");
        assert!(state.markup.is_none());
    }

    #[tokio::test]
    async fn test_overlapping_generate_is_busy() {
        let session = filled_session().await;
        let _held = session.try_begin_generation().unwrap();
        let result = generate(&session, &FlakyEnricher::default(), &templates()).await;
        assert!(matches!(result, Err(AppError::Busy)));
    }

    #[tokio::test]
    async fn test_empty_job_role_changes_nothing() {
        let session = filled_session().await;
        generate(&session, &FlakyEnricher::default(), &templates())
            .await
            .unwrap();
        run_ats(&session, "SRE", &FixedScorer { fail: false })
            .await
            .unwrap();

        let result = run_ats(&session, "  ", &FixedScorer { fail: true }).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(session.read().await.ats.is_some());
    }

    #[tokio::test]
    async fn test_ats_failure_clears_previous_report() {
        let session = filled_session().await;
        generate(&session, &FlakyEnricher::default(), &templates())
            .await
            .unwrap();
        let outcome = run_ats(&session, "SRE", &FixedScorer { fail: false })
            .await
            .unwrap();
        assert!(outcome.markup.contains("Mention Kubernetes."));

        let result = run_ats(&session, "SRE", &FixedScorer { fail: true }).await;
        assert!(matches!(result, Err(AppError::Scoring)));
        assert!(session.read().await.ats.is_none());
    }

    #[tokio::test]
    async fn test_download_requires_preview() {
        let session = filled_session().await;
        let result = download(&session, &StaticSink).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        generate(&session, &FlakyEnricher::default(), &templates())
            .await
            .unwrap();
        let file = download(&session, &StaticSink).await.unwrap();
        assert_eq!(file.filename, "Ada_Lovelace_Resume.pdf");
    }
}
