//! C4-PlantUML sanitizing and rendering for c4gate.
//!
//! This crate turns decoded C4-PlantUML sources into rendered diagrams:
//! - Recognizes `!include` directives line by line
//! - Inlines the bundled C4 library for includes naming one of its tiers
//! - Drops or keeps other includes depending on the [`SafeMode`]
//! - Frames the result and hands it to a [`RenderEngine`] (Kroki by default)
//!
//! # Architecture
//!
//! - [`directive`]: include directive parsing and classification
//! - [`safe_mode`]: safe mode and the per-line policy
//! - [`sanitizer`]: the line-by-line rewrite
//! - [`convert`]: delimiter framing and the rendering engine contract
//! - [`kroki`]: HTTP rendering engine
//! - [`service`]: diagram services dispatched by the gateway
//!
//! # Example
//!
//! ```
//! use c4gate_diagrams::{SafeMode, sanitize};
//! use c4gate_library::{EmbeddedResources, Library};
//!
//! let library = Library::load(&EmbeddedResources).unwrap();
//! let source = "@startuml\n!include /etc/passwd\nA -> B\n@enduml";
//! assert_eq!(
//!     sanitize(source, &library, SafeMode::Secure),
//!     "@startuml\nA -> B\n@enduml\n"
//! );
//! ```

mod consts;
pub mod convert;
pub mod directive;
mod format;
pub mod kroki;
pub mod safe_mode;
pub mod sanitizer;
pub mod service;

pub use consts::DEFAULT_TIMEOUT;
pub use convert::{RenderEngine, RenderError, with_delimiter};
pub use directive::{LineKind, SourceLine, classify, parse_line};
pub use format::FileFormat;
pub use kroki::KrokiEngine;
pub use safe_mode::{Decision, SafeMode, allow};
pub use sanitizer::sanitize;
pub use service::{C4PlantUml, ConvertError, DiagramType};
