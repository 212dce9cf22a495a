//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use c4gate_diagrams::{ConvertError, RenderError};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// No service for the requested diagram type.
    #[error("Unknown diagram type: {0}")]
    UnknownDiagramType(String),

    /// Requested output format is not recognized.
    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    /// Conversion failed (unsupported format or rendering failure).
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// Rendering task failed to complete.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// HTTP status for this error.
    ///
    /// Engine errors keep the engine's own status; unreachable engines map to
    /// 502.
    fn status(&self) -> StatusCode {
        match self {
            Self::UnknownDiagramType(_) => StatusCode::NOT_FOUND,
            Self::UnknownFormat(_) | Self::Convert(ConvertError::UnsupportedFormat(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Convert(ConvertError::Render(RenderError::Engine { status, .. })) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Convert(ConvertError::Render(
                RenderError::Transport(_) | RenderError::Io(_),
            )) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::UnknownDiagramType(name) => {
                json!({"error": "Unknown diagram type", "type": name})
            }
            Self::UnknownFormat(format) => {
                json!({"error": "Unknown output format", "format": format})
            }
            Self::Convert(ConvertError::Render(RenderError::Engine { message, .. })) => {
                json!({"error": message})
            }
            Self::Convert(_) | Self::Internal(_) => json!({"error": self.to_string()}),
        };

        (status, axum::Json(body)).into_response()
    }
}
