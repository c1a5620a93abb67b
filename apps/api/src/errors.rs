use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::ats::{CheckError, GENERIC_FAILURE};
use crate::export::ExportError;
use crate::form::sections::SectionError;
use crate::form::validation::ValidationReport;
use crate::render::TemplateError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Form is invalid")]
    InvalidForm(ValidationReport),

    #[error("A resume is already being generated for this session")]
    Busy,

    #[error("Scoring failed")]
    Scoring,

    #[error("Export error: {0}")]
    Export(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SectionError> for AppError {
    fn from(e: SectionError) -> Self {
        match e {
            SectionError::GroupNotFound(_) => AppError::NotFound(e.to_string()),
            SectionError::UnknownField { .. } => AppError::Validation(e.to_string()),
        }
    }
}

impl From<TemplateError> for AppError {
    fn from(e: TemplateError) -> Self {
        match e {
            TemplateError::NotFound(_) => AppError::NotFound(e.to_string()),
            TemplateError::InvalidName(_) => AppError::Validation(e.to_string()),
            TemplateError::Io(io) => AppError::Internal(anyhow::Error::new(io)),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::NothingToExport => AppError::Validation(e.to_string()),
            ExportError::Browser(msg) => AppError::Export(msg),
        }
    }
}

impl From<CheckError> for AppError {
    fn from(e: CheckError) -> Self {
        match e {
            CheckError::MissingJobRole | CheckError::NothingRendered => {
                AppError::Validation(e.to_string())
            }
            CheckError::Failed => AppError::Scoring,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details: Option<Value> = None;

        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidForm(report) => {
                details = serde_json::to_value(report).ok();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "INVALID_FORM",
                    report
                        .alert
                        .clone()
                        .unwrap_or_else(|| "Please fix the highlighted fields".to_string()),
                )
            }
            AppError::Busy => (StatusCode::CONFLICT, "BUSY", self.to_string()),
            AppError::Scoring => (
                StatusCode::BAD_GATEWAY,
                "SCORING_ERROR",
                GENERIC_FAILURE.to_string(),
            ),
            AppError::Export(msg) => {
                tracing::error!("Export error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_ERROR",
                    "Failed to export resume".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
