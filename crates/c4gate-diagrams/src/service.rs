//! Diagram services served by the gateway.
//!
//! Services form a closed set: [`DiagramType`] names them and the hosting
//! dispatcher matches on it. Each service only shares the thin
//! sanitize/convert contract.

use std::sync::Arc;

use c4gate_library::Library;

use crate::convert::{RenderEngine, RenderError, convert};
use crate::format::FileFormat;
use crate::safe_mode::SafeMode;
use crate::sanitizer::sanitize;

/// Diagram types known to the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramType {
    C4PlantUml,
}

impl DiagramType {
    /// Parse a diagram type from a request path segment.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "c4plantuml" => Some(Self::C4PlantUml),
            _ => None,
        }
    }

    /// Path segment naming this diagram type.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::C4PlantUml => "c4plantuml",
        }
    }
}

/// Conversion error.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Format is not produced by this service.
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(FileFormat),
    /// Rendering engine failure.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// C4-PlantUML service.
///
/// Cheap to clone: the library and the engine are shared.
#[derive(Clone)]
pub struct C4PlantUml {
    library: Arc<Library>,
    safe_mode: SafeMode,
    engine: Arc<dyn RenderEngine>,
}

impl C4PlantUml {
    /// Formats produced by this service.
    pub const SUPPORTED_FORMATS: [FileFormat; 4] = [
        FileFormat::Png,
        FileFormat::Svg,
        FileFormat::Jpeg,
        FileFormat::Base64,
    ];

    /// Create the service from startup state.
    #[must_use]
    pub fn new(library: Arc<Library>, safe_mode: SafeMode, engine: Arc<dyn RenderEngine>) -> Self {
        Self {
            library,
            safe_mode,
            engine,
        }
    }

    /// Safe mode applied to every request.
    #[must_use]
    pub fn safe_mode(&self) -> SafeMode {
        self.safe_mode
    }

    /// Whether `format` is produced by this service.
    #[must_use]
    pub fn supports(&self, format: FileFormat) -> bool {
        Self::SUPPORTED_FORMATS.contains(&format)
    }

    /// Resolve library includes and apply the safe mode policy.
    #[must_use]
    pub fn sanitize(&self, source: &str) -> String {
        sanitize(source, &self.library, self.safe_mode)
    }

    /// Sanitize `source` and render it to `format`.
    ///
    /// Blocks on the rendering engine.
    pub fn convert(&self, source: &str, format: FileFormat) -> Result<Vec<u8>, ConvertError> {
        if !self.supports(format) {
            return Err(ConvertError::UnsupportedFormat(format));
        }
        let sanitized = self.sanitize(source);
        Ok(convert(self.engine.as_ref(), &sanitized, format)?)
    }
}
