//! Internal constants for diagram rendering.

use std::time::Duration;

/// Default HTTP timeout for rendering engine requests (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Rendering engine endpoint for sanitized C4 sources.
///
/// Sanitized sources are plain `PlantUML` once the library has been inlined.
pub(crate) const PLANTUML_ENDPOINT: &str = "plantuml";
