// Extractor: free-text notes → prompt → chat completion → strict JSON → field merge.
// All LLM calls go through llm_client — no direct HTTP calls here.

pub mod extractor;
pub mod handlers;
pub mod prompts;

pub use extractor::{extract, select_input, ExtractionError};
