use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::form::sections::{FormState, SectionError, SectionGroup, StaticFieldsPatch};
use crate::models::SectionKind;
use crate::session::handlers::load_session;
use crate::state::AppState;

/// POST /api/v1/sessions/:id/sections/:section
pub async fn handle_add_section(
    State(state): State<AppState>,
    Path((id, kind)): Path<(Uuid, String)>,
) -> Result<(StatusCode, Json<SectionGroup>), AppError> {
    let kind: SectionKind = kind.parse().map_err(AppError::Validation)?;
    let session = load_session(&state, id).await?;

    let mut guard = session.write().await;
    let handle = guard.form.sections.add_section(kind);
    let group = guard
        .form
        .sections
        .get(handle.id)
        .cloned()
        .ok_or(SectionError::GroupNotFound(handle.id))?;

    debug!("Session {id}: added {kind} group {}", handle.id);
    Ok((StatusCode::CREATED, Json(group)))
}

/// DELETE /api/v1/sessions/:id/sections/:section
pub async fn handle_remove_section(
    State(state): State<AppState>,
    Path((id, group_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let session = load_session(&state, id).await?;
    if !session.write().await.form.sections.remove(group_id) {
        return Err(SectionError::GroupNotFound(group_id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/sessions/:id/sections/:section
/// Body: field name → value. Nothing is written unless every field name is known.
pub async fn handle_update_section(
    State(state): State<AppState>,
    Path((id, group_id)): Path<(Uuid, Uuid)>,
    Json(fields): Json<BTreeMap<String, String>>,
) -> Result<Json<SectionGroup>, AppError> {
    let session = load_session(&state, id).await?;
    let mut guard = session.write().await;
    let sections = &mut guard.form.sections;

    let kind = sections
        .get(group_id)
        .map(|g| g.kind)
        .ok_or(SectionError::GroupNotFound(group_id))?;
    if let Some(field) = fields.keys().find(|f| kind.field_index(f).is_none()) {
        return Err(SectionError::UnknownField {
            kind,
            field: field.clone(),
        }
        .into());
    }

    for (field, value) in fields {
        sections.set_field(group_id, &field, value)?;
    }

    let group = sections
        .get(group_id)
        .cloned()
        .ok_or(SectionError::GroupNotFound(group_id))?;
    Ok(Json(group))
}

/// PATCH /api/v1/sessions/:id/form
pub async fn handle_update_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<StaticFieldsPatch>,
) -> Result<Json<FormState>, AppError> {
    let session = load_session(&state, id).await?;
    let mut guard = session.write().await;
    guard.form.apply(patch);
    Ok(Json(guard.form.clone()))
}
