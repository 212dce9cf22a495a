//! Diagram rendering endpoint.
//!
//! Accepts decoded diagram source as the request body and returns the
//! rendered diagram in the requested format.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use c4gate_diagrams::{ConvertError, DiagramType, FileFormat, SafeMode};
use c4gate_library::{Library, LibraryName};
use md5::{Digest, Md5};

use crate::error::ServerError;
use crate::state::AppState;

/// Cache lifetime for rendered diagrams (5 days).
const CACHE_CONTROL: &str = "public, max-age=432000";

/// Handle POST /{diagram_type}/{format}.
pub(crate) async fn render_diagram(
    State(state): State<Arc<AppState>>,
    Path((diagram_type, format)): Path<(String, String)>,
    headers: HeaderMap,
    source: String,
) -> Result<Response, ServerError> {
    let diagram_type =
        DiagramType::parse(&diagram_type).ok_or(ServerError::UnknownDiagramType(diagram_type))?;
    let format = FileFormat::parse(&format).ok_or(ServerError::UnknownFormat(format))?;

    let service = match diagram_type {
        DiagramType::C4PlantUml => state.c4plantuml.clone(),
    };
    if !service.supports(format) {
        return Err(ConvertError::UnsupportedFormat(format).into());
    }

    let etag = compute_etag(
        &state.version,
        &state.library_fingerprint,
        service.safe_mode(),
        format,
        &source,
    );

    // Check If-None-Match header for conditional request
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    // Rendering engine calls block
    let result = tokio::task::spawn_blocking(move || service.convert(&source, format))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?;

    let data = result.map_err(|e| {
        tracing::warn!(
            diagram_type = diagram_type.name(),
            format = format.as_str(),
            error = %e,
            "Diagram conversion failed"
        );
        ServerError::from(e)
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_owned()),
            (header::ETAG, etag),
            (header::CACHE_CONTROL, CACHE_CONTROL.to_owned()),
        ],
        data,
    )
        .into_response())
}

/// Compute `ETag` from version, library fingerprint, safe mode, format and
/// source.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars). Safe mode and library
/// both change the rendered output for the same source.
fn compute_etag(
    version: &str,
    library_fingerprint: &str,
    safe_mode: SafeMode,
    format: FileFormat,
    source: &str,
) -> String {
    let hash = Md5::digest(
        format!("{version}:{library_fingerprint}:{safe_mode}:{format}:{source}").as_bytes(),
    );
    format!("\"{}\"", &hex::encode(hash)[..16])
}

/// Fingerprint of the loaded library contents.
///
/// The component bundle contains every tier, so hashing it covers all four.
pub(crate) fn library_fingerprint(library: &Library) -> String {
    let hash = Md5::digest(library.bundle(LibraryName::Component).as_bytes());
    hex::encode(hash)[..16].to_owned()
}
