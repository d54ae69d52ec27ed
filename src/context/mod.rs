//! Conversation context module
//!
//! Persists the server's continuation token between invocations.

pub mod store;

// Re-export commonly used types
pub use store::{sanitize_model_name, ContextStore, CONTEXT_FILE};
