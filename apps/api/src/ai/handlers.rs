use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::ai::LlmAi;
use crate::ats::{AtsReport, AtsRequest, AtsScorer};
use crate::enrichment::{Enricher, EnrichmentKind, EnrichmentRequest, EnrichmentResponse};
use crate::state::AppState;

/// Errors of the `/ai/*` routes. These keep the flat `{error: "..."}` body the remote
/// clients expect rather than the API's `{error: {code, message}}` envelope.
#[derive(Debug)]
pub enum AiRouteError {
    InvalidJson,
    UnsupportedType,
    InvalidInput,
    Failure,
    NotConfigured,
}

impl IntoResponse for AiRouteError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AiRouteError::InvalidJson => (StatusCode::BAD_REQUEST, "Invalid JSON"),
            AiRouteError::UnsupportedType => (StatusCode::BAD_REQUEST, "Unsupported type"),
            AiRouteError::InvalidInput => (StatusCode::BAD_REQUEST, "Invalid input"),
            AiRouteError::Failure => (StatusCode::INTERNAL_SERVER_ERROR, "AI failure"),
            AiRouteError::NotConfigured => {
                (StatusCode::SERVICE_UNAVAILABLE, "AI service not configured")
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn configured(state: &AppState) -> Result<&LlmAi, AiRouteError> {
    state.ai.as_deref().ok_or(AiRouteError::NotConfigured)
}

/// Parses `{type, payload}` by hand so a bad body and an unknown type get distinct answers.
fn parse_improve(body: &[u8]) -> Result<EnrichmentRequest, AiRouteError> {
    let data: Value = serde_json::from_slice(body).map_err(|_| AiRouteError::InvalidJson)?;
    let object = data
        .as_object()
        .filter(|o| !o.is_empty())
        .ok_or(AiRouteError::InvalidJson)?;

    let kind: EnrichmentKind = object
        .get("type")
        .cloned()
        .and_then(|t| serde_json::from_value(t).ok())
        .ok_or(AiRouteError::UnsupportedType)?;

    let payload = object.get("payload").cloned().unwrap_or_else(|| json!({}));
    Ok(EnrichmentRequest { kind, payload })
}

/// POST /ai/improve
pub async fn handle_improve(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<EnrichmentResponse>, AiRouteError> {
    let request = parse_improve(&body)?;
    let ai = configured(&state)?;

    let result = ai.improve(&request).await.map_err(|e| {
        error!("/ai/improve failed for '{}': {e}", request.kind.as_str());
        AiRouteError::Failure
    })?;

    Ok(Json(EnrichmentResponse { result }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AtsInput {
    #[serde(default)]
    job_role: Option<String>,
    #[serde(default)]
    resume_text: Option<String>,
}

fn parse_ats(body: &[u8]) -> Result<AtsRequest, AiRouteError> {
    let input: AtsInput = serde_json::from_slice(body).unwrap_or_default();
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    match (non_empty(input.job_role), non_empty(input.resume_text)) {
        (Some(job_role), Some(resume_text)) => Ok(AtsRequest {
            job_role,
            resume_text,
        }),
        _ => Err(AiRouteError::InvalidInput),
    }
}

/// POST /ai/ats
pub async fn handle_ats(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AtsReport>, AiRouteError> {
    let request = parse_ats(&body)?;
    let ai = configured(&state)?;

    let report = ai.score(&request).await.map_err(|e| {
        error!("/ai/ats failed: {e}");
        AiRouteError::Failure
    })?;

    Ok(Json(report))
}
