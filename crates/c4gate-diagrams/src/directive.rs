//! Include directive recognition.
//!
//! Classifies single source lines. A line is an include directive when its
//! first non-blank token is one of the `!include` spellings:
//!
//! - `!include`, `!include_many`, `!include_once`
//! - `!includeurl`, `!includesub`, `!includedef`
//!
//! The directive name must be followed by whitespace and the referenced path,
//! or by nothing at all. A bare `!include` is deliberately recognized too,
//! with an empty path: PlantUML's own pattern requires a path and would let
//! such a line through as text, while here it matches no library tier and is
//! dropped in secure mode. Directives never span lines.

use std::sync::LazyLock;

use c4gate_library::LibraryName;
use regex::Regex;

static INCLUDE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*!(?:include|include_many|include_once|includeurl|includesub|includedef)(?:\s+(.*?))?\s*$",
    )
    .unwrap()
});

/// A parsed source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLine<'a> {
    /// Include directive with its trimmed target path.
    Include { path: &'a str },
    /// Anything else.
    Plain,
}

/// Classification of a line against the C4 library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Include directive referencing a library tier.
    LibraryInclude(LibraryName),
    /// Include directive referencing anything else.
    ForeignInclude,
    /// Not an include directive.
    Plain,
}

/// Parse one line (without its line terminator).
#[must_use]
pub fn parse_line(line: &str) -> SourceLine<'_> {
    match INCLUDE_PATTERN.captures(line) {
        Some(caps) => SourceLine::Include {
            path: caps.get(1).map_or("", |m| m.as_str()),
        },
        None => SourceLine::Plain,
    }
}

/// Parse a line and resolve include targets against the library names.
#[must_use]
pub fn classify(line: &str) -> LineKind {
    match parse_line(line) {
        SourceLine::Include { path } => {
            LibraryName::match_path(path).map_or(LineKind::ForeignInclude, LineKind::LibraryInclude)
        }
        SourceLine::Plain => LineKind::Plain,
    }
}
