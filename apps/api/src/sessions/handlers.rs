use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::fields::{FieldKey, FieldSet};
use crate::models::session::{SessionSnapshot, SessionStage};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FieldLabel {
    pub key: FieldKey,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FieldsResponse {
    pub stage: SessionStage,
    pub fields: FieldSet,
    pub labels: Vec<FieldLabel>,
}

impl FieldsResponse {
    fn new(stage: SessionStage, fields: FieldSet) -> Self {
        Self {
            stage,
            fields,
            labels: FieldKey::ALL
                .into_iter()
                .map(|key| FieldLabel {
                    key,
                    label: key.label(),
                })
                .collect(),
        }
    }
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    let session = state.sessions.create().await;
    info!(
        "Created session {} ({} active)",
        session.id,
        state.sessions.count().await
    );
    (StatusCode::CREATED, Json(SessionSnapshot::from(&session)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(SessionSnapshot::from(&session)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    info!("Ended session {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/sessions/:id/fields
pub async fn handle_get_fields(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FieldsResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(FieldsResponse::new(session.stage, session.fields)))
}

/// PATCH /api/v1/sessions/:id/fields
///
/// Per-key user edits. Every key is validated before any is applied.
pub async fn handle_edit_fields(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(edits): Json<HashMap<String, String>>,
) -> Result<Json<FieldsResponse>, AppError> {
    let updates = parse_edits(edits)?;

    let (stage, fields) = state
        .sessions
        .update(id, |session| {
            if !updates.is_empty() {
                session.fields.apply(updates);
                session.mark_populated();
            }
            Ok((session.stage, session.fields.clone()))
        })
        .await?;

    Ok(Json(FieldsResponse::new(stage, fields)))
}

fn parse_edits(edits: HashMap<String, String>) -> Result<Vec<(FieldKey, String)>, AppError> {
    let mut unknown: Vec<String> = Vec::new();
    let mut updates = Vec::with_capacity(edits.len());

    for (name, value) in edits {
        match name.parse::<FieldKey>() {
            Ok(key) => updates.push((key, value)),
            Err(_) => unknown.push(name),
        }
    }

    if !unknown.is_empty() {
        unknown.sort();
        return Err(AppError::Validation(format!(
            "unknown field(s): {}",
            unknown.join(", ")
        )));
    }

    Ok(updates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edits_accepts_known_keys() {
        let edits = HashMap::from([("timeline".to_string(), "Q4".to_string())]);
        let updates = parse_edits(edits).unwrap();
        assert_eq!(updates, vec![(FieldKey::Timeline, "Q4".to_string())]);
    }

    #[test]
    fn test_parse_edits_rejects_unknown_keys() {
        let edits = HashMap::from([
            ("timeline".to_string(), "Q4".to_string()),
            ("budget".to_string(), "$1M".to_string()),
        ]);
        match parse_edits(edits) {
            Err(AppError::Validation(msg)) => assert!(msg.contains("budget")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_fields_response_lists_labels_in_order() {
        let response = FieldsResponse::new(SessionStage::Empty, FieldSet::default());
        assert_eq!(response.labels.len(), 11);
        assert_eq!(response.labels[0].label, "Customer Name");
        assert_eq!(response.labels[10].key, FieldKey::KeyContacts);
    }
}
