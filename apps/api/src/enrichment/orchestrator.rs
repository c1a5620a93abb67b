//! Enrichment Orchestrator: best-effort rewriting of the free-text fields of a model.
//!
//! Flow: plan one task per enrichable field → run all tasks concurrently →
//!       apply every successful result to its own field → report counts.
//!
//! Tasks target disjoint fields, so each field is replaced at most once. A failing task
//! is logged and forgotten: the field keeps the user's text and the pipeline moves on.

use futures::future::join_all;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::enrichment::client::{Enricher, EnrichmentKind, EnrichmentRequest};
use crate::models::DocumentModel;

/// The model field an enrichment result is written back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichTarget {
    About,
    Skills,
    ProjectDescription(usize),
    ExperienceDescription(usize),
    AchievementDescription(usize),
}

#[derive(Debug, Clone)]
pub struct EnrichmentTask {
    pub target: EnrichTarget,
    pub request: EnrichmentRequest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentSummary {
    pub attempted: usize,
    pub applied: usize,
    pub failed: usize,
}

/// Lists the fields worth sending. Items with an empty description are skipped.
pub fn plan_tasks(model: &DocumentModel) -> Vec<EnrichmentTask> {
    let mut tasks = vec![
        EnrichmentTask {
            target: EnrichTarget::About,
            request: EnrichmentRequest {
                kind: EnrichmentKind::Summary,
                payload: json!({ "about": model.about, "skills": model.skills }),
            },
        },
        EnrichmentTask {
            target: EnrichTarget::Skills,
            request: EnrichmentRequest {
                kind: EnrichmentKind::Skills,
                payload: json!({ "skills": model.skills }),
            },
        },
    ];

    for (i, project) in model.projects.iter().enumerate() {
        if !project.description.is_empty() {
            tasks.push(EnrichmentTask {
                target: EnrichTarget::ProjectDescription(i),
                request: EnrichmentRequest {
                    kind: EnrichmentKind::Project,
                    payload: json!(project),
                },
            });
        }
    }
    for (i, experience) in model.experience.iter().enumerate() {
        if !experience.description.is_empty() {
            tasks.push(EnrichmentTask {
                target: EnrichTarget::ExperienceDescription(i),
                request: EnrichmentRequest {
                    kind: EnrichmentKind::Experience,
                    payload: json!(experience),
                },
            });
        }
    }
    for (i, achievement) in model.achievements.iter().enumerate() {
        if !achievement.description.is_empty() {
            tasks.push(EnrichmentTask {
                target: EnrichTarget::AchievementDescription(i),
                request: EnrichmentRequest {
                    kind: EnrichmentKind::Achievement,
                    payload: json!(achievement),
                },
            });
        }
    }

    tasks
}

/// Runs every planned task and writes successful results into `model` in place.
/// Never fails: every task settles before this returns.
pub async fn enrich(model: &mut DocumentModel, enricher: &dyn Enricher) -> EnrichmentSummary {
    let tasks = plan_tasks(model);
    let mut summary = EnrichmentSummary {
        attempted: tasks.len(),
        ..Default::default()
    };

    let outcomes = join_all(tasks.iter().map(|task| async move {
        (task, enricher.improve(&task.request).await)
    }))
    .await;

    for (task, outcome) in outcomes {
        match outcome {
            Ok(Some(text)) => {
                if let Some(slot) = field_mut(model, task.target) {
                    *slot = text.trim().to_string();
                    summary.applied += 1;
                }
            }
            Ok(None) => {
                debug!(
                    "Enrichment ({}) returned no result, keeping original text",
                    task.request.kind.as_str()
                );
            }
            Err(e) => {
                summary.failed += 1;
                warn!(
                    "Enrichment ({}) failed, keeping original text: {e}",
                    task.request.kind.as_str()
                );
            }
        }
    }

    info!(
        "Enrichment settled: {} attempted, {} applied, {} failed",
        summary.attempted, summary.applied, summary.failed
    );
    summary
}

fn field_mut(model: &mut DocumentModel, target: EnrichTarget) -> Option<&mut String> {
    match target {
        EnrichTarget::About => Some(&mut model.about),
        EnrichTarget::Skills => Some(&mut model.skills),
        EnrichTarget::ProjectDescription(i) => model.projects.get_mut(i).map(|p| &mut p.description),
        EnrichTarget::ExperienceDescription(i) => {
            model.experience.get_mut(i).map(|e| &mut e.description)
        }
        EnrichTarget::AchievementDescription(i) => {
            model.achievements.get_mut(i).map(|a| &mut a.description)
        }
    }
}
