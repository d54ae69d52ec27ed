//! nino - command-line client for a local Ollama server
//!
//! Sends one prompt to the generate endpoint and streams the answer to the
//! terminal and/or a file as it arrives. The server's continuation token is
//! saved per model so the next invocation continues the conversation.
//!
//! # Architecture
//!
//! - `cli`: flags, environment defaults and prompt sources
//! - `streaming`: HTTP transport, JSON framing and the response decoder
//! - `context`: per-model continuation token storage
//! - `display`: output sink and loading animation

pub mod errors;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use errors::{NinoError, Result};
pub use logging::Logger;

pub mod bootstrap;
pub mod cli;
pub mod context;
pub mod display;
pub mod images;
pub mod streaming;

// Shared request flow for the binary and tests
pub mod execution;
pub use execution::execute_request;
