//! Generate endpoint client
//!
//! One blocking-style POST per invocation:
//! - Endpoint: POST /api/generate (full URL is configurable)
//! - No request timeout, the server may stream for as long as it likes
//! - Non-2xx answers come back as errors carrying the raw body

use crate::errors::{NinoError, Result};
use crate::logging::Logger;
use crate::types::RequestPayload;
use reqwest::{Client, Response};

/// Default generate endpoint
pub const DEFAULT_GENERATE_URL: &str = "http://localhost:11434/api/generate";

/// Default model
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Client for the generate endpoint
#[derive(Debug, Clone)]
pub struct GenerateClient {
    client: Client,
    url: String,
}

impl GenerateClient {
    /// Create a client for the default endpoint
    pub fn new() -> Result<Self> {
        Self::with_url(DEFAULT_GENERATE_URL)
    }

    /// Create a client posting to `url`
    pub fn with_url(url: &str) -> Result<Self> {
        let client = Client::builder().build().map_err(NinoError::Http)?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Send the request and return the response once headers are in
    ///
    /// The body is left unread so the caller can stream it.
    pub async fn send(&self, payload: &RequestPayload, log: &Logger) -> Result<Response> {
        log.info(format_args!(
            "POST {} (model: {}, stream: {}, images: {}, context: {})",
            self.url,
            payload.model,
            payload.stream,
            payload.images.len(),
            payload.context.as_ref().map_or(0, Vec::len)
        ));

        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| NinoError::Connectivity(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
            log.error(format_args!("Server answered HTTP {}", status));
            return Err(NinoError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        log.debug(format_args!("Server answered HTTP {}", status));
        Ok(response)
    }

    /// Get the endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }
}
