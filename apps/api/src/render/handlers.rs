//! Axum route handlers for rendering and downloads.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::session::SessionStage;
use crate::render::docx::export_docx;
use crate::render::pdf::export_pdf;
use crate::render::{render, ExportFormat, Section};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub stage: SessionStage,
    pub sections: Vec<Section>,
    pub text: String,
}

/// POST /api/v1/sessions/:id/render
///
/// Renders the current fields and caches the document for download.
/// The fields stay editable; any later edit requires a fresh render.
pub async fn handle_render(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RenderResponse>, AppError> {
    let document = state
        .sessions
        .update(id, |session| {
            if session.fields.is_empty() {
                debug!("Session {id}: rendering with every field empty");
            }
            let document = render(&session.fields);
            session.mark_rendered(document.clone());
            Ok(document)
        })
        .await?;

    info!("Session {id}: rendered {} sections", document.sections.len());

    Ok(Json(RenderResponse {
        stage: SessionStage::Rendered,
        text: document.text(),
        sections: document.sections,
    }))
}

/// GET /api/v1/sessions/:id/export/docx
pub async fn handle_export_docx(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    export(&state, id, ExportFormat::Docx).await
}

/// GET /api/v1/sessions/:id/export/pdf
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    export(&state, id, ExportFormat::Pdf).await
}

async fn export(
    state: &AppState,
    id: Uuid,
    format: ExportFormat,
) -> Result<impl IntoResponse, AppError> {
    let document = state.sessions.get(id).await?.document.ok_or_else(|| {
        AppError::Conflict("Generate the document before downloading it".to_string())
    })?;

    // Document assembly is CPU-bound; keep it off the async executor.
    let buffer = tokio::task::spawn_blocking(move || match format {
        ExportFormat::Docx => export_docx(&document),
        ExportFormat::Pdf => export_pdf(&document),
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in export: {e}")))??;

    info!(
        "Session {id}: exported {} ({} bytes)",
        format.file_name(),
        buffer.len()
    );

    let disposition = format!("attachment; filename=\"{}\"", format.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, format.mime_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(buffer),
    ))
}
