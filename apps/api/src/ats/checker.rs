//! Compatibility Checker: scores the rendered résumé against a job role.
//!
//! Preconditions are checked before any request goes out. Scorer failures of every
//! kind collapse into one error; the cause is logged, never shown.

use scraper::Html;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::ats::client::{AtsReport, AtsRequest, AtsScorer};
use crate::render::formatter::escape_html;

/// The only scoring failure text a user ever sees.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error, PartialEq)]
pub enum CheckError {
    #[error("Job role is required")]
    MissingJobRole,

    #[error("Please generate resume first.")]
    NothingRendered,

    #[error("Something went wrong. Please try again.")]
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub report: AtsReport,
    /// Score and suggestions as display markup, suggestions in service order.
    pub markup: String,
}

pub async fn check(
    rendered: Option<&str>,
    job_role: &str,
    scorer: &dyn AtsScorer,
) -> Result<CheckOutcome, CheckError> {
    let job_role = job_role.trim();
    if job_role.is_empty() {
        return Err(CheckError::MissingJobRole);
    }

    let resume_text = rendered.map(visible_text).unwrap_or_default();
    if resume_text.is_empty() {
        return Err(CheckError::NothingRendered);
    }

    let request = AtsRequest {
        job_role: job_role.to_string(),
        resume_text,
    };

    let report = scorer.score(&request).await.map_err(|e| {
        error!("ATS check failed: {e}");
        CheckError::Failed
    })?;

    info!(
        "ATS score {} with {} suggestions for role '{}'",
        report.ats_score,
        report.suggestions.len(),
        request.job_role
    );

    let markup = render_report(&report);
    Ok(CheckOutcome { report, markup })
}

/// Text a reader would see in the rendered markup, one text run per line.
/// Style and script contents are skipped.
pub fn visible_text(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    fragment
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| matches!(e.name(), "style" | "script" | "template"))
            });
            if hidden {
                return None;
            }
            let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
            (!line.is_empty()).then_some(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_report(report: &AtsReport) -> String {
    let mut out = format!(
        "<div class=\"ats-score\">{}</div><div class=\"ats-suggestions\">",
        format_score(report.ats_score)
    );
    for s in &report.suggestions {
        out.push_str(&format!(
            "<div class=\"suggestion\"><h4>{}</h4><p>{}</p></div>",
            escape_html(&s.title),
            escape_html(&s.detail)
        ));
    }
    out.push_str("</div>");
    out
}

fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}
