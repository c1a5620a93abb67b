//! Axum route handlers for the Sessions API.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ats::CheckOutcome;
use crate::errors::AppError;
use crate::render::DEFAULT_TEMPLATE;
use crate::session::context::{Session, SessionView};
use crate::session::pipeline::{self, GenerateOutcome};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SelectTemplateRequest {
    pub template: String,
}

#[derive(Debug, Serialize)]
pub struct SelectTemplateResponse {
    pub template: String,
    pub rerendered: bool,
}

#[derive(Debug, Deserialize)]
pub struct AtsCheckRequest {
    #[serde(default)]
    pub job_role: String,
}

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<String>,
    pub default: &'static str,
}

pub async fn load_session(state: &AppState, id: Uuid) -> Result<Arc<Session>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let session = state.sessions.create().await;
    (StatusCode::CREATED, Json(session.view().await))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = load_session(&state, id).await?;
    Ok(Json(session.view().await))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_discard_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id).await {
        return Err(AppError::NotFound(format!("Session {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GenerateOutcome>, AppError> {
    let session = load_session(&state, id).await?;
    let outcome =
        pipeline::generate(&session, state.enricher.as_ref(), state.templates.as_ref()).await?;
    Ok(Json(outcome))
}

/// PUT /api/v1/sessions/:id/template
pub async fn handle_select_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectTemplateRequest>,
) -> Result<Json<SelectTemplateResponse>, AppError> {
    let session = load_session(&state, id).await?;
    let rerendered =
        pipeline::select_template(&session, &req.template, state.templates.as_ref()).await?;
    Ok(Json(SelectTemplateResponse {
        template: req.template,
        rerendered,
    }))
}

/// GET /api/v1/sessions/:id/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let session = load_session(&state, id).await?;
    let markup = session.read().await.markup.clone();
    markup
        .map(Html)
        .ok_or_else(|| AppError::NotFound("No preview has been generated yet".to_string()))
}

/// GET /api/v1/sessions/:id/download
pub async fn handle_download(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = load_session(&state, id).await?;
    let file = pipeline::download(&session, state.exporter.as_ref()).await?;

    let disposition = content_disposition(&file.filename);
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}

/// ASCII `filename` for old clients plus an RFC 5987 `filename*` carrying the UTF-8 name.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(filename)
    )
}

/// POST /api/v1/sessions/:id/ats
pub async fn handle_ats_check(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AtsCheckRequest>,
) -> Result<Json<CheckOutcome>, AppError> {
    let session = load_session(&state, id).await?;
    let outcome = pipeline::run_ats(&session, &req.job_role, state.scorer.as_ref()).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
) -> Result<Json<TemplateListResponse>, AppError> {
    let templates = state.templates.list().await?;
    Ok(Json(TemplateListResponse {
        templates,
        default: DEFAULT_TEMPLATE,
    }))
}
