//! Request and response payloads for `POST /api/generate`

use serde::{Deserialize, Serialize};

/// The only value the server accepts for `format`
pub const JSON_FORMAT: &str = "json";

/// Body of the generate request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestPayload {
    pub model: String,
    pub prompt: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub system: Option<String>,

    /// Base64-encoded images for multimodal models
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub images: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub format: Option<String>,

    pub stream: bool,

    /// How long the server keeps the model loaded, e.g. "5m"
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub keep_alive: Option<String>,

    /// Continuation token from a previous exchange
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub context: Option<Vec<i64>>,
}

impl RequestPayload {
    /// Streaming request with no optional fields set
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: true,
            ..Default::default()
        }
    }
}

/// One object of the response stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponsePayload {
    pub model: String,
    pub created_at: String,
    pub response: String,
    pub done: bool,

    /// Only present on the final object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<i64>>,
}

impl ResponsePayload {
    /// Continuation token, if the server sent a non-empty one
    pub fn continuation(&self) -> Option<&[i64]> {
        self.context.as_deref().filter(|tokens| !tokens.is_empty())
    }
}
