//! Extractor — asks the model to fill the field set from free-text notes.
//!
//! The merge is computed on a copy of the current field set; callers commit it
//! to the session only on success, so every failure leaves the session as it was.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::extraction::prompts::{build_extraction_prompt, INPUT_MISSING_MESSAGE};
use crate::llm_client::{CompletionBackend, LlmError};
use crate::models::fields::{FieldKey, FieldSet};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{}", INPUT_MISSING_MESSAGE)]
    InputMissing,

    #[error("LLM API error: {0}")]
    Api(#[from] LlmError),

    #[error("Failed to parse model response as JSON: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        raw_response: String,
    },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Result of a successful extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutcome {
    /// The full field set after the merge.
    pub fields: FieldSet,
    /// Keys the model supplied, in canonical order.
    pub updated: Vec<FieldKey>,
    /// Keys in the response that are not part of the field set.
    pub ignored: Vec<String>,
}

/// Picks the text to extract from. A non-empty uploaded file wins over pasted notes.
pub fn select_input<'a>(
    file_text: Option<&'a str>,
    raw_text: Option<&'a str>,
) -> Result<&'a str, ExtractionError> {
    [file_text, raw_text]
        .into_iter()
        .flatten()
        .find(|t| !t.trim().is_empty())
        .ok_or(ExtractionError::InputMissing)
}

/// Runs one extraction against `current`, returning the merged field set.
///
/// Empty input is rejected before the model is called.
pub async fn extract(
    backend: &dyn CompletionBackend,
    current: &FieldSet,
    input_text: &str,
) -> Result<ExtractionOutcome, ExtractionError> {
    if input_text.trim().is_empty() {
        return Err(ExtractionError::InputMissing);
    }

    let prompt = build_extraction_prompt(input_text);
    info!(
        "Extracting fields from {} chars of notes (model: {})",
        input_text.chars().count(),
        backend.model()
    );

    let raw_response = backend.complete(&prompt).await.map_err(|e| {
        warn!("Extraction call failed: {e}");
        ExtractionError::Api(e)
    })?;

    merge_response(current, &raw_response)
}

/// Parses the model's reply strictly as a JSON object and merges recognised keys.
pub fn merge_response(
    current: &FieldSet,
    raw_response: &str,
) -> Result<ExtractionOutcome, ExtractionError> {
    let parsed: Value =
        serde_json::from_str(raw_response).map_err(|source| ExtractionError::Parse {
            source,
            raw_response: raw_response.to_string(),
        })?;

    let object = match parsed {
        Value::Object(object) => object,
        other => {
            return Err(ExtractionError::Unexpected(format!(
                "model response is a JSON {}, expected an object",
                json_kind(&other)
            )))
        }
    };

    let mut updates = Vec::new();
    let mut ignored = Vec::new();
    for (name, value) in &object {
        match name.parse::<FieldKey>() {
            Ok(key) => {
                if let Some(text) = coerce_value(value) {
                    updates.push((key, text));
                }
            }
            Err(_) => {
                debug!("Ignoring unknown key '{name}' in model response");
                ignored.push(name.clone());
            }
        }
    }

    let mut fields = current.clone();
    let mut updated: Vec<FieldKey> = updates.iter().map(|(k, _)| *k).collect();
    fields.apply(updates);
    updated.sort_by_key(|k| FieldKey::ALL.iter().position(|a| a == k));
    updated.dedup();

    Ok(ExtractionOutcome {
        fields,
        updated,
        ignored,
    })
}

/// Flattens a JSON value into field text. `null` means "leave the field alone".
fn coerce_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => Some(value.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    pub enum FakeReply {
        Text(String),
        ApiFailure { status: u16, message: String },
    }

    /// Canned backend that counts how often it is called.
    pub struct FakeBackend {
        pub reply: FakeReply,
        pub calls: AtomicUsize,
    }

    impl FakeBackend {
        pub fn text(reply: &str) -> Self {
            Self {
                reply: FakeReply::Text(reply.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(status: u16, message: &str) -> Self {
            Self {
                reply: FakeReply::ApiFailure {
                    status,
                    message: message.to_string(),
                },
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionBackend for FakeBackend {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                FakeReply::Text(text) => Ok(text.clone()),
                FakeReply::ApiFailure { status, message } => Err(LlmError::Api {
                    status: *status,
                    message: message.clone(),
                }),
            }
        }

        fn model(&self) -> &str {
            "fake-model"
        }
    }

    fn prefilled() -> FieldSet {
        FieldSet {
            industry: "Retail".to_string(),
            timeline: "6 weeks".to_string(),
            ..FieldSet::default()
        }
    }

    #[test]
    fn test_select_input_prefers_file() {
        assert_eq!(select_input(Some("file"), Some("pasted")).unwrap(), "file");
    }

    #[test]
    fn test_select_input_falls_back_to_pasted_text() {
        assert_eq!(select_input(None, Some("pasted")).unwrap(), "pasted");
        assert_eq!(select_input(Some("  \n"), Some("pasted")).unwrap(), "pasted");
    }

    #[test]
    fn test_select_input_missing() {
        assert!(matches!(
            select_input(None, None),
            Err(ExtractionError::InputMissing)
        ));
        assert!(matches!(
            select_input(Some(""), Some("   ")),
            Err(ExtractionError::InputMissing)
        ));
    }

    #[tokio::test]
    async fn test_empty_input_never_calls_model() {
        let backend = FakeBackend::text("{}");
        let err = extract(&backend, &FieldSet::default(), "   ").await.unwrap_err();
        assert!(matches!(err, ExtractionError::InputMissing));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_partial_response_merges_only_present_keys() {
        let backend = FakeBackend::text(
            r#"{"customer_name": "Acme Corp", "timeline": "Q3 pilot"}"#,
        );
        let outcome = extract(&backend, &prefilled(), "notes").await.unwrap();

        assert_eq!(backend.call_count(), 1);
        assert_eq!(outcome.fields.customer_name, "Acme Corp");
        assert_eq!(outcome.fields.timeline, "Q3 pilot");
        assert_eq!(outcome.fields.industry, "Retail");
        assert_eq!(outcome.fields.key_contacts, "");
        assert_eq!(
            outcome.updated,
            vec![FieldKey::CustomerName, FieldKey::Timeline]
        );
    }

    #[tokio::test]
    async fn test_multibyte_notes_are_extracted() {
        let backend = FakeBackend::text(r#"{"company_background": "Café Müller GmbH"}"#);
        let outcome = extract(&backend, &FieldSet::default(), "Notizen: Café Müller – Köln")
            .await
            .unwrap();
        assert_eq!(backend.call_count(), 1);
        assert_eq!(outcome.fields.company_background, "Café Müller GmbH");
    }

    #[tokio::test]
    async fn test_empty_string_values_do_overwrite() {
        let backend = FakeBackend::text(r#"{"industry": ""}"#);
        let outcome = extract(&backend, &prefilled(), "notes").await.unwrap();
        assert_eq!(outcome.fields.industry, "");
    }

    #[tokio::test]
    async fn test_non_json_response_is_parse_error_with_raw_text() {
        let reply = "Sure! Here is the JSON you asked for: {\"industry\": \"Retail\"}";
        let backend = FakeBackend::text(reply);
        let err = extract(&backend, &prefilled(), "notes").await.unwrap_err();
        match err {
            ExtractionError::Parse { raw_response, .. } => assert_eq!(raw_response, reply),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_fenced_json_is_not_accepted() {
        let reply = "```json\n{\"industry\": \"Retail\"}\n```";
        assert!(matches!(
            merge_response(&FieldSet::default(), reply),
            Err(ExtractionError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_api_failure_surfaces_message() {
        let backend = FakeBackend::failing(401, "Incorrect API key provided");
        let err = extract(&backend, &prefilled(), "notes").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Api(_)));
        assert!(err.to_string().contains("Incorrect API key provided"));
    }

    #[test]
    fn test_non_object_json_is_unexpected() {
        let err = merge_response(&FieldSet::default(), r#"["Acme"]"#).unwrap_err();
        match err {
            ExtractionError::Unexpected(msg) => assert!(msg.contains("array")),
            other => panic!("expected unexpected error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let outcome =
            merge_response(&FieldSet::default(), r#"{"budget": "$1M", "timeline": "Q1"}"#)
                .unwrap();
        assert_eq!(outcome.ignored, vec!["budget".to_string()]);
        assert_eq!(outcome.updated, vec![FieldKey::Timeline]);
    }

    #[test]
    fn test_non_string_values_are_flattened() {
        let outcome = merge_response(
            &prefilled(),
            r#"{
                "tech_stack": ["Rust", "Postgres", 16],
                "timeline": 12,
                "key_contacts": {"cto": "Jane Doe"},
                "industry": null
            }"#,
        )
        .unwrap();
        assert_eq!(outcome.fields.tech_stack, "Rust, Postgres, 16");
        assert_eq!(outcome.fields.timeline, "12");
        assert_eq!(outcome.fields.key_contacts, r#"{"cto":"Jane Doe"}"#);
        assert_eq!(outcome.fields.industry, "Retail");
        assert!(!outcome.updated.contains(&FieldKey::Industry));
    }

    #[test]
    fn test_full_response_fills_every_field() {
        let mut object = serde_json::Map::new();
        for key in FieldKey::ALL {
            object.insert(key.as_str().to_string(), Value::String(format!("v-{key}")));
        }
        let reply = Value::Object(object).to_string();
        let outcome = merge_response(&FieldSet::default(), &reply).unwrap();
        for key in FieldKey::ALL {
            assert_eq!(outcome.fields.get(key), format!("v-{key}"));
        }
        assert_eq!(outcome.updated, FieldKey::ALL.to_vec());
    }
}
