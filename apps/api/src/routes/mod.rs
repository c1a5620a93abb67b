pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::ai::handlers as ai;
use crate::form::handlers as form;
use crate::session::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions API
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get_session).delete(sessions::handle_discard_session),
        )
        .route("/api/v1/sessions/:id/form", patch(form::handle_update_form))
        .route(
            "/api/v1/sessions/:id/sections/:section",
            post(form::handle_add_section)
                .patch(form::handle_update_section)
                .delete(form::handle_remove_section),
        )
        .route(
            "/api/v1/sessions/:id/generate",
            post(sessions::handle_generate),
        )
        .route(
            "/api/v1/sessions/:id/template",
            put(sessions::handle_select_template),
        )
        .route("/api/v1/sessions/:id/preview", get(sessions::handle_preview))
        .route(
            "/api/v1/sessions/:id/download",
            get(sessions::handle_download),
        )
        .route("/api/v1/sessions/:id/ats", post(sessions::handle_ats_check))
        .route("/api/v1/templates", get(sessions::handle_list_templates))
        // AI service
        .route("/ai/improve", post(ai::handle_improve))
        .route("/ai/ats", post(ai::handle_ats))
        .with_state(state)
}
