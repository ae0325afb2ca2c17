//! Axum route handler for the extraction flow.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{extract, select_input};
use crate::extraction::prompts::EXTRACTION_SUCCESS_MESSAGE;
use crate::models::fields::{FieldKey, FieldSet};
use crate::models::session::SessionStage;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ExtractRequest {
    /// Text of an uploaded `.txt` file. Takes precedence over `raw_text`.
    #[serde(default)]
    pub file_text: Option<String>,
    /// Notes pasted by hand.
    #[serde(default)]
    pub raw_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub message: &'static str,
    pub stage: SessionStage,
    pub fields: FieldSet,
    pub updated: Vec<FieldKey>,
    pub ignored: Vec<String>,
}

/// POST /api/v1/sessions/:id/extract
///
/// Runs the extractor and merges the result into the session's fields.
/// On any failure the session keeps its previous fields.
pub async fn handle_extract(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let input = select_input(request.file_text.as_deref(), request.raw_text.as_deref())?;

    // Snapshot, then release the store before the model call.
    let current = state.sessions.get(id).await?.fields;
    let outcome = extract(state.llm.as_ref(), &current, input).await?;

    info!(
        "Session {id}: extraction updated {} field(s), ignored {} key(s)",
        outcome.updated.len(),
        outcome.ignored.len()
    );

    let (stage, fields) = state
        .sessions
        .update(id, |session| {
            // Re-apply only the extracted keys so edits made during the call survive.
            session.fields.apply(
                outcome
                    .updated
                    .iter()
                    .map(|key| (*key, outcome.fields.get(*key).to_string())),
            );
            session.mark_populated();
            Ok((session.stage, session.fields.clone()))
        })
        .await?;

    Ok(Json(ExtractResponse {
        message: EXTRACTION_SUCCESS_MESSAGE,
        stage,
        fields,
        updated: outcome.updated,
        ignored: outcome.ignored,
    }))
}
