use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::fields::FieldSet;
use crate::render::Document;

/// Where a session is in the extract → edit → render flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStage {
    #[default]
    Empty,
    Populated,
    Rendered,
}

/// One user's scoping-document workspace.
///
/// Fields may be re-edited after rendering; any change drops the cached
/// document so exports always reflect an explicit render.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub fields: FieldSet,
    pub stage: SessionStage,
    pub document: Option<Document>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Last time any request touched the session, reads included. Drives expiry.
    pub last_active_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            fields: FieldSet::default(),
            stage: SessionStage::Empty,
            document: None,
            created_at: now,
            updated_at: now,
            last_active_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_active_at = Utc::now();
    }

    /// Records a change to the field set (extraction or manual edit).
    pub fn mark_populated(&mut self) {
        self.stage = SessionStage::Populated;
        self.document = None;
        self.updated_at = Utc::now();
    }

    pub fn mark_rendered(&mut self, document: Document) {
        self.stage = SessionStage::Rendered;
        self.document = Some(document);
        self.updated_at = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire view of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub stage: SessionStage,
    pub fields: FieldSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id,
            stage: session.stage,
            fields: session.fields.clone(),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert_eq!(session.stage, SessionStage::Empty);
        assert!(session.fields.is_empty());
        assert!(session.document.is_none());
    }

    #[test]
    fn test_edit_after_render_drops_document() {
        let mut session = Session::new();
        session.mark_populated();
        let doc = render(&session.fields);
        session.mark_rendered(doc);
        assert_eq!(session.stage, SessionStage::Rendered);

        session.mark_populated();
        assert_eq!(session.stage, SessionStage::Populated);
        assert!(session.document.is_none());
    }

    #[test]
    fn test_stage_serializes_snake_case() {
        let json = serde_json::to_string(&SessionStage::Populated).unwrap();
        assert_eq!(json, "\"populated\"");
    }
}
