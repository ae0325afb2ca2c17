pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::extraction::handlers as extraction;
use crate::render::handlers as render;
use crate::sessions::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session workspace
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get_session).delete(sessions::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/fields",
            get(sessions::handle_get_fields).patch(sessions::handle_edit_fields),
        )
        // Extractor
        .route(
            "/api/v1/sessions/:id/extract",
            post(extraction::handle_extract),
        )
        // Renderer
        .route("/api/v1/sessions/:id/render", post(render::handle_render))
        .route(
            "/api/v1/sessions/:id/export/docx",
            get(render::handle_export_docx),
        )
        .route(
            "/api/v1/sessions/:id/export/pdf",
            get(render::handle_export_pdf),
        )
        .with_state(state)
}
