//! HTTP server for c4gate.
//!
//! Serves C4-PlantUML diagrams over HTTP using axum:
//! - `POST /{diagram_type}/{format}` renders the decoded source in the body
//! - `GET /health` reports version and safe mode
//!
//! The C4 library is loaded before the listener binds. A missing library
//! resource aborts startup, so no request is ever served with a partial
//! library.
//!
//! # Quick Start
//!
//! ```ignore
//! use c4gate_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         kroki_url: "http://localhost:8000".to_owned(),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Client ──HTTP──► axum server (c4gate-server)
//!                      │
//!                      ├─► C4PlantUml::sanitize (library bundles + safe mode)
//!                      │
//!                      └─► spawn_blocking ──► KrokiEngine ──HTTP──► Kroki
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use c4gate_diagrams::{C4PlantUml, DEFAULT_TIMEOUT, KrokiEngine, RenderEngine, SafeMode};
use c4gate_library::Library;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Safe mode applied to every request.
    pub safe_mode: SafeMode,
    /// Kroki server URL used to render sanitized sources.
    pub kroki_url: String,
    /// HTTP timeout for rendering requests.
    pub timeout: Duration,
    /// Directory with the C4 library resources (`None` uses the embedded ones).
    pub library_dir: Option<PathBuf>,
    /// Application version (for `ETag` computation).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            safe_mode: SafeMode::default(),
            kroki_url: "https://kroki.io".to_owned(),
            timeout: DEFAULT_TIMEOUT,
            library_dir: None,
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the C4 library cannot be loaded or the server fails
/// to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Library must be complete before accepting any request
    let library = Arc::new(Library::open(config.library_dir.as_deref())?);

    let engine: Arc<dyn RenderEngine> = Arc::new(KrokiEngine::with_timeout(
        config.kroki_url.clone(),
        config.timeout,
    ));

    let state = Arc::new(AppState {
        library_fingerprint: handlers::render::library_fingerprint(&library),
        c4plantuml: C4PlantUml::new(library, config.safe_mode, engine),
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        safe_mode = %config.safe_mode,
        kroki_url = %config.kroki_url,
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from c4gate config.
///
/// Unrecognized safe mode names fall back to [`SafeMode::Secure`].
#[must_use]
pub fn server_config_from_config(config: &c4gate_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        safe_mode: SafeMode::get(&config.security.safe_mode, SafeMode::Secure),
        kroki_url: config.renderer.kroki_url.clone(),
        timeout: config.renderer.timeout(),
        library_dir: config.library_dir.clone(),
        version,
    }
}
