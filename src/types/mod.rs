//! Type definitions module
//!
//! Wire payloads exchanged with the generation endpoint.

pub mod payload;

// Re-export commonly used types
pub use payload::{RequestPayload, ResponsePayload, JSON_FORMAT};
