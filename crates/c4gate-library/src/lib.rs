//! C4-PlantUML library bundles for c4gate.
//!
//! The C4 macro library comes in four tiers, each building on the previous one:
//!
//! | Tier | Resource | Bundle text |
//! |---|---|---|
//! | Core | `c4.puml` | core |
//! | Context | `c4_context.puml` | core + context |
//! | Container | `c4_container.puml` | core + context + container |
//! | Component | `c4_component.puml` | core + context + container + component |
//!
//! A [`Library`] holds the four pre-composed bundles. It is built once at
//! startup from a [`ResourceLoader`] and shared read-only afterwards.
//!
//! # Example
//!
//! ```
//! use c4gate_library::{EmbeddedResources, Library, LibraryName};
//!
//! let library = Library::load(&EmbeddedResources).unwrap();
//! let context = library.bundle(LibraryName::Context);
//! assert!(context.starts_with(library.core()));
//! ```

mod lines;
mod loader;

use std::path::Path;

pub use lines::{Lines, split_lines};
pub use loader::{DirResources, EmbeddedResources, FnLoader, ResourceLoader, from_fn};

/// Library loading error.
///
/// Any of these is fatal at startup: the gateway never serves requests with a
/// partial library.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// Resource could not be located.
    #[error("Library resource not found: {0}")]
    NotFound(String),

    /// Resource exists but could not be read.
    #[error("Unable to read library resource {name}: {source}")]
    Io {
        /// Resource name or path.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Resource is not valid UTF-8 text.
    #[error("Library resource is not valid UTF-8: {0}")]
    InvalidUtf8(String),
}

/// Tier of the C4 library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibraryName {
    Core,
    Context,
    Container,
    Component,
}

impl LibraryName {
    /// All tiers in nesting order (each bundle contains the previous one).
    pub const ALL: [Self; 4] = [Self::Core, Self::Context, Self::Container, Self::Component];

    /// Order in which resource names are tested against an include path.
    ///
    /// First match wins. Because matching is by substring, a path mentioning
    /// both `c4.puml` and `c4_context.puml` resolves to [`LibraryName::Core`].
    pub const MATCH_ORDER: [Self; 4] = [
        Self::Core,
        Self::Component,
        Self::Container,
        Self::Context,
    ];

    /// Resource file name for this tier.
    #[must_use]
    pub fn resource_name(self) -> &'static str {
        match self {
            Self::Core => "c4.puml",
            Self::Context => "c4_context.puml",
            Self::Container => "c4_container.puml",
            Self::Component => "c4_component.puml",
        }
    }

    /// Find the tier referenced by an include path.
    ///
    /// Case-insensitive substring match of the path against each resource
    /// name, in [`MATCH_ORDER`](Self::MATCH_ORDER).
    #[must_use]
    pub fn match_path(path: &str) -> Option<Self> {
        let path = path.to_lowercase();
        Self::MATCH_ORDER
            .into_iter()
            .find(|name| path.contains(name.resource_name()))
    }
}

/// The four composed library bundles.
#[derive(Debug, Clone)]
pub struct Library {
    core: String,
    context: String,
    container: String,
    component: String,
}

impl Library {
    /// Load and compose all four bundles.
    ///
    /// Resources are read in nesting order and every one of them must be
    /// present.
    pub fn load(loader: &dyn ResourceLoader) -> Result<Self, LibraryError> {
        let core = read(loader, LibraryName::Core)?;
        let context = core.clone() + &read(loader, LibraryName::Context)?;
        let container = context.clone() + &read(loader, LibraryName::Container)?;
        let component = container.clone() + &read(loader, LibraryName::Component)?;

        tracing::info!(source = %loader.describe(), bytes = component.len(), "Loaded C4 library");

        Ok(Self {
            core,
            context,
            container,
            component,
        })
    }

    /// Load from `dir` when given, otherwise from the embedded resources.
    pub fn open(dir: Option<&Path>) -> Result<Self, LibraryError> {
        match dir {
            Some(dir) => Self::load(&DirResources::new(dir)),
            None => Self::load(&EmbeddedResources),
        }
    }

    /// Bundle text for a tier.
    #[must_use]
    pub fn bundle(&self, name: LibraryName) -> &str {
        match name {
            LibraryName::Core => &self.core,
            LibraryName::Context => &self.context,
            LibraryName::Container => &self.container,
            LibraryName::Component => &self.component,
        }
    }

    /// Core bundle text.
    #[must_use]
    pub fn core(&self) -> &str {
        &self.core
    }
}

/// Read one resource and normalize its line endings.
///
/// Lines are joined with `\n`, so CRLF and lone CR become LF and the final
/// terminator is dropped.
fn read(loader: &dyn ResourceLoader, name: LibraryName) -> Result<String, LibraryError> {
    let text = loader.load(name.resource_name())?;
    tracing::debug!(resource = name.resource_name(), "Read library resource");
    Ok(split_lines(&text).collect::<Vec<_>>().join("\n"))
}
