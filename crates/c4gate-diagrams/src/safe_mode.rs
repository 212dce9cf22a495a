//! Safe mode policy for include directives.
//!
//! | Line | `Secure` / `Safe` | `Unsafe` |
//! |---|---|---|
//! | Library include | inject bundle | inject bundle |
//! | Other include | drop | pass through |
//! | Not an include | pass through | pass through |

use std::fmt;

use c4gate_library::LibraryName;

use crate::directive::LineKind;

/// Process-wide safe mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SafeMode {
    /// Include directives are honored as written.
    Unsafe,
    /// Same restrictions as `Secure` for C4 sources.
    Safe,
    /// Only library includes are honored.
    #[default]
    Secure,
}

impl SafeMode {
    /// Parse a safe mode name (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unsafe" => Some(Self::Unsafe),
            "safe" => Some(Self::Safe),
            "secure" => Some(Self::Secure),
            _ => None,
        }
    }

    /// Parse a configured value, falling back to `default` when unrecognized.
    #[must_use]
    pub fn get(value: &str, default: Self) -> Self {
        Self::parse(value).unwrap_or_else(|| {
            tracing::warn!(value, fallback = %default, "Unrecognized safe mode");
            default
        })
    }

    /// Lowercase name of this mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unsafe => "unsafe",
            Self::Safe => "safe",
            Self::Secure => "secure",
        }
    }
}

impl fmt::Display for SafeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the sanitizer does with one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Replace the line with the bundle text.
    Inject(LibraryName),
    /// Emit the line exactly as received.
    Passthrough,
    /// Emit nothing.
    Drop,
}

/// Decide what to do with a classified line under `mode`.
#[must_use]
pub fn allow(mode: SafeMode, kind: LineKind) -> Decision {
    match kind {
        LineKind::LibraryInclude(name) => Decision::Inject(name),
        LineKind::ForeignInclude if mode == SafeMode::Unsafe => Decision::Passthrough,
        LineKind::ForeignInclude => Decision::Drop,
        LineKind::Plain => Decision::Passthrough,
    }
}
