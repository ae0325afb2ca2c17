use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionBackend;
use crate::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Chat-completion backend used by the extractor. `LlmClient` in production.
    pub llm: Arc<dyn CompletionBackend>,
    pub config: Config,
}
