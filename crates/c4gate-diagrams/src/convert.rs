//! Hand-off of sanitized sources to the rendering engine.
//!
//! The engine itself is external; this module only frames the source with the
//! `@startuml`/`@enduml` delimiters the engine requires and maps the requested
//! [`FileFormat`] onto what the engine produces.

use std::borrow::Cow;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;

use crate::format::FileFormat;

/// Rendering failure, forwarded to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Engine answered with an error status.
    #[error("HTTP {status}: {message}")]
    Engine {
        /// HTTP status returned by the engine.
        status: u16,
        /// Error body returned by the engine.
        message: String,
    },
    /// Engine could not be reached.
    #[error("rendering engine unavailable: {0}")]
    Transport(String),
    /// Engine response could not be read.
    #[error("I/O error: {0}")]
    Io(String),
}

/// External engine turning `PlantUML` source into image bytes.
///
/// Callers only pass [`FileFormat::Png`], [`FileFormat::Svg`] or
/// [`FileFormat::Jpeg`]; [`convert`] derives `Base64` from PNG output.
pub trait RenderEngine: Send + Sync {
    /// Render framed `PlantUML` source to `format`.
    fn render(&self, source: &str, format: FileFormat) -> Result<Vec<u8>, RenderError>;
}

/// Ensure the source is enclosed in `@start...`/`@end...` delimiters.
///
/// Sources already starting with `@start` are returned unchanged; anything
/// else is trimmed and wrapped in `@startuml`/`@enduml`.
#[must_use]
pub fn with_delimiter(source: &str) -> Cow<'_, str> {
    let trimmed = source.trim();
    if trimmed.starts_with("@start") {
        Cow::Borrowed(source)
    } else {
        Cow::Owned(format!("@startuml\n{trimmed}\n@enduml"))
    }
}

/// Frame `source` and render it via `engine`.
pub fn convert(
    engine: &dyn RenderEngine,
    source: &str,
    format: FileFormat,
) -> Result<Vec<u8>, RenderError> {
    let source = with_delimiter(source);
    match format {
        FileFormat::Base64 => {
            let png = engine.render(&source, FileFormat::Png)?;
            let encoded = BASE64_STANDARD.encode(png);
            Ok(format!("data:image/png;base64,{encoded}").into_bytes())
        }
        FileFormat::Png | FileFormat::Svg | FileFormat::Jpeg => engine.render(&source, format),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;

    /// Engine recording its inputs and echoing a fixed body.
    struct RecordingEngine {
        calls: Mutex<Vec<(String, FileFormat)>>,
        body: Vec<u8>,
    }

    impl RecordingEngine {
        fn new(body: &[u8]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                body: body.to_vec(),
            }
        }
    }

    impl RenderEngine for RecordingEngine {
        fn render(&self, source: &str, format: FileFormat) -> Result<Vec<u8>, RenderError> {
            self.calls
                .lock()
                .unwrap()
                .push((source.to_owned(), format));
            Ok(self.body.clone())
        }
    }

    struct FailingEngine;

    impl RenderEngine for FailingEngine {
        fn render(&self, _source: &str, _format: FileFormat) -> Result<Vec<u8>, RenderError> {
            Err(RenderError::Engine {
                status: 400,
                message: "Syntax Error? (line 2)".to_owned(),
            })
        }
    }

    #[test]
    fn test_with_delimiter_keeps_delimited_source() {
        let source = "@startuml\nA -> B\n@enduml\n";
        assert!(matches!(with_delimiter(source), Cow::Borrowed(s) if s == source));
    }

    #[test]
    fn test_with_delimiter_leading_whitespace() {
        let source = "\n  @startuml\nA -> B\n@enduml";
        assert_eq!(with_delimiter(source), source);
    }

    #[test]
    fn test_with_delimiter_wraps_bare_source() {
        assert_eq!(
            with_delimiter("\nA -> B\n"),
            "@startuml\nA -> B\n@enduml"
        );
    }

    #[test]
    fn test_convert_svg_passes_framed_source() {
        let engine = RecordingEngine::new(b"<svg/>");
        let data = convert(&engine, "A -> B\n", FileFormat::Svg).unwrap();

        assert_eq!(data, b"<svg/>");
        let calls = engine.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![("@startuml\nA -> B\n@enduml".to_owned(), FileFormat::Svg)]
        );
    }

    #[test]
    fn test_convert_base64_uses_png() {
        let engine = RecordingEngine::new(b"\x89PNG");
        let data = convert(&engine, "@startuml\n@enduml", FileFormat::Base64).unwrap();

        assert_eq!(
            String::from_utf8(data).unwrap(),
            "data:image/png;base64,iVBORw=="
        );
        assert_eq!(engine.calls.lock().unwrap()[0].1, FileFormat::Png);
    }

    #[test]
    fn test_convert_propagates_engine_error() {
        let err = convert(&FailingEngine, "A -> B", FileFormat::Png).unwrap_err();
        assert!(matches!(err, RenderError::Engine { status: 400, .. }));
        assert_eq!(err.to_string(), "HTTP 400: Syntax Error? (line 2)");
    }
}
