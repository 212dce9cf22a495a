//! `c4gate serve` command implementation.

use std::path::PathBuf;

use c4gate_config::{CliSettings, Config};
use c4gate_server::{run_server, server_config_from_config};
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover c4gate.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Kroki server URL for diagram rendering (overrides config).
    #[arg(long)]
    kroki_url: Option<String>,

    /// Safe mode: unsafe, safe or secure (overrides config).
    #[arg(long, env = "KROKI_SAFE_MODE")]
    safe_mode: Option<String>,

    /// Directory with C4 library resources (default: embedded library).
    #[arg(long)]
    library_dir: Option<PathBuf>,

    /// Enable verbose output (request and sanitizer logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            kroki_url: self.kroki_url,
            safe_mode: self.safe_mode,
            library_dir: self.library_dir,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let server_config = server_config_from_config(&config, version.to_owned());

        output.highlight(&format!(
            "Starting server on {}:{}",
            server_config.host, server_config.port
        ));
        output.info(&format!("Safe mode: {}", server_config.safe_mode));
        output.info(&format!("Kroki URL: {}", server_config.kroki_url));
        match &server_config.library_dir {
            Some(dir) => output.info(&format!("C4 library: {}", dir.display())),
            None => output.info("C4 library: embedded"),
        }

        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
