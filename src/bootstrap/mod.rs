//! Server reachability check
//!
//! Before sending anything, make sure something is listening at the
//! configured address. The check is advisory: it only decides whether to
//! show a "start the server" hint instead of attempting the request.

use reqwest::Url;
use std::time::Duration;
use tokio::net::TcpStream;

/// How long to wait for the TCP handshake
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Exit code when the server is not running
pub const EXIT_CODE_SETUP_NEEDED: i32 = 2;

/// Reachability checker for the generate endpoint
pub struct Bootstrap {
    url: String,
    model_tag: String,
}

impl Bootstrap {
    /// Create a checker for the endpoint at `url`
    pub fn new(url: impl Into<String>, model_tag: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            model_tag: model_tag.into(),
        }
    }

    /// Model named in the setup hint
    pub fn model_tag(&self) -> &str {
        &self.model_tag
    }

    /// `host:port` the endpoint lives at, if the URL names one
    pub fn probe_address(&self) -> Option<String> {
        let url = Url::parse(&self.url).ok()?;
        let host = url.host_str()?;
        let port = url.port_or_known_default()?;
        Some(format!("{}:{}", host, port))
    }

    /// Check if the server accepts TCP connections
    pub async fn check_server_running(&self) -> bool {
        let Some(address) = self.probe_address() else {
            return false;
        };

        matches!(
            tokio::time::timeout(PROBE_TIMEOUT, TcpStream::connect(address)).await,
            Ok(Ok(_))
        )
    }

    /// Tell the user how to get the server going
    pub fn show_server_hint(&self) {
        eprintln!("Oops! It looks like the Ollama server isn't running at {}.", self.url);
        eprintln!("Please start the server and run the model you'd like to use. For example:");
        eprintln!("   ollama serve & ollama run {}", self.model_tag);
        eprintln!();
    }
}
