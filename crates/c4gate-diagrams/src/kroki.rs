//! Kroki rendering engine.
//!
//! Sends framed `PlantUML` source to a Kroki (or compatible) server via HTTP POST
//! and returns the raw response body.

use std::time::Duration;

use ureq::Agent;

use crate::consts::{DEFAULT_TIMEOUT, PLANTUML_ENDPOINT};
use crate::convert::{RenderEngine, RenderError};
use crate::format::FileFormat;

/// Create HTTP agent with the specified timeout.
///
/// The agent pools connections, so create it once and reuse it.
pub fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// [`RenderEngine`] backed by a Kroki server.
pub struct KrokiEngine {
    server_url: String,
    agent: Agent,
}

impl KrokiEngine {
    /// Create an engine for the Kroki server at `server_url`.
    #[must_use]
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_timeout(server_url, DEFAULT_TIMEOUT)
    }

    /// Create an engine with a custom HTTP timeout.
    #[must_use]
    pub fn with_timeout(server_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            server_url: server_url.into().trim_end_matches('/').to_owned(),
            agent: create_agent(timeout),
        }
    }

    /// Kroki URL rendering `format`.
    fn endpoint_url(&self, format: FileFormat) -> String {
        format!("{}/{PLANTUML_ENDPOINT}/{}", self.server_url, format.as_str())
    }
}

impl RenderEngine for KrokiEngine {
    fn render(&self, source: &str, format: FileFormat) -> Result<Vec<u8>, RenderError> {
        let url = self.endpoint_url(format);

        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "text/plain")
            .send(source.as_bytes())
            .map_err(|e| RenderError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let message = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            tracing::warn!(%url, status, "Rendering engine returned an error");
            return Err(RenderError::Engine { status, message });
        }

        body.read_to_vec().map_err(|e| RenderError::Io(e.to_string()))
    }
}
