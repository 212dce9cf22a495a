//! Output formats.

use std::fmt;

/// Output format requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Png,
    Svg,
    Jpeg,
    /// PNG image as a `data:image/png;base64,` URI in plain text.
    Base64,
}

impl FileFormat {
    /// Parse a format name from a request path segment.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "base64" => Some(Self::Base64),
            _ => None,
        }
    }

    /// Return format as string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Jpeg => "jpeg",
            Self::Base64 => "base64",
        }
    }

    /// MIME type of the response body.
    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
            Self::Jpeg => "image/jpeg",
            Self::Base64 => "text/plain",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
