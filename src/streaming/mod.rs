//! Streaming client module
//!
//! Provides the generate endpoint client, the incremental JSON framer and the
//! response decoder built on top of it.

pub mod client;
pub mod decoder;
pub mod parser;

// Re-export commonly used types
pub use client::{GenerateClient, DEFAULT_GENERATE_URL, DEFAULT_MODEL};
pub use decoder::{decode_response, ContextHandler, DecodeSummary};
pub use parser::{JsonParser, MAX_BUFFER_SIZE};
