//! CLI error types.

use c4gate_config::ConfigError;
use c4gate_library::LibraryError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Library(#[from] LibraryError),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Validation(String),
}
