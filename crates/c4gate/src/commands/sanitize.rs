//! `c4gate sanitize` command implementation.
//!
//! Runs the same sanitizer the server applies before rendering and writes the
//! result to stdout. Useful to inspect what a given safe mode lets through.

use std::io::{Read, Write};
use std::path::PathBuf;

use c4gate_diagrams::{SafeMode, sanitize};
use c4gate_library::Library;
use clap::Args;

use crate::error::CliError;

/// Environment variable shared with `serve` for the safe mode.
const SAFE_MODE_ENV: &str = "KROKI_SAFE_MODE";

/// Arguments for the sanitize command.
#[derive(Args)]
pub(crate) struct SanitizeArgs {
    /// Diagram source file (default: read from stdin).
    file: Option<PathBuf>,

    /// Safe mode: unsafe, safe or secure (default: $KROKI_SAFE_MODE, then
    /// secure).
    #[arg(long)]
    safe_mode: Option<String>,

    /// Directory with C4 library resources (default: embedded library).
    #[arg(long)]
    library_dir: Option<PathBuf>,

    /// Enable verbose output (log dropped includes).
    #[arg(short, long)]
    pub verbose: bool,
}

impl SanitizeArgs {
    /// Execute the sanitize command.
    ///
    /// # Errors
    ///
    /// Returns an error if `--safe-mode` is unknown, the library cannot be
    /// loaded, or the source cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let from_env = std::env::var(SAFE_MODE_ENV).ok();
        let mode = resolve_safe_mode(self.safe_mode.as_deref(), from_env.as_deref())?;
        let library = Library::open(self.library_dir.as_deref())?;

        let source = match &self.file {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };

        let sanitized = sanitize(&source, &library, mode);
        tracing::info!(
            %mode,
            input_bytes = source.len(),
            output_bytes = sanitized.len(),
            "Sanitized diagram source"
        );

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(sanitized.as_bytes())?;
        stdout.flush()?;

        Ok(())
    }
}

/// Pick the safe mode from the flag, then the environment, then `Secure`.
///
/// An unknown flag value is an error. An unknown environment value falls
/// back to `Secure` like it does for `serve`.
fn resolve_safe_mode(flag: Option<&str>, from_env: Option<&str>) -> Result<SafeMode, CliError> {
    match (flag, from_env) {
        (Some(value), _) => parse_safe_mode(value),
        (None, Some(value)) => Ok(SafeMode::get(value, SafeMode::Secure)),
        (None, None) => Ok(SafeMode::Secure),
    }
}

/// Parse an explicit `--safe-mode` value.
fn parse_safe_mode(value: &str) -> Result<SafeMode, CliError> {
    SafeMode::parse(value).ok_or_else(|| {
        CliError::Validation(format!(
            "Unknown safe mode '{value}' (expected unsafe, safe or secure)"
        ))
    })
}
