// Session workspace: in-memory store and the field-editing endpoints.
// Each session owns one field set; nothing is shared between sessions.

pub mod handlers;
pub mod store;

pub use store::SessionStore;
