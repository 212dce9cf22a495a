//! Resource loaders for the library bundles.
//!
//! A [`ResourceLoader`] maps a logical resource name (`c4.puml`, ...) to its text:
//!
//! - [`EmbeddedResources`]: files compiled into the binary via `rust-embed`
//! - [`DirResources`]: files read from a directory at startup
//! - [`from_fn`]: any closure, mostly for test fixtures

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::LibraryError;

/// Source of library resource text, keyed by resource name.
pub trait ResourceLoader: Send + Sync {
    /// Load the full text of the named resource.
    fn load(&self, name: &str) -> Result<String, LibraryError>;

    /// Short human-readable description used in startup logs.
    fn describe(&self) -> String;
}

#[derive(rust_embed::RustEmbed)]
#[folder = "resources/"]
struct Resources;

/// Library resources compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedResources;

impl ResourceLoader for EmbeddedResources {
    fn load(&self, name: &str) -> Result<String, LibraryError> {
        let file = Resources::get(name).ok_or_else(|| LibraryError::NotFound(name.to_owned()))?;
        String::from_utf8(file.data.into_owned())
            .map_err(|_| LibraryError::InvalidUtf8(name.to_owned()))
    }

    fn describe(&self) -> String {
        "embedded".to_owned()
    }
}

/// Library resources read from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirResources {
    dir: PathBuf,
}

impl DirResources {
    /// Create a loader reading resources from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory resources are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ResourceLoader for DirResources {
    fn load(&self, name: &str) -> Result<String, LibraryError> {
        let path = self.dir.join(name);
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LibraryError::NotFound(path.display().to_string()),
            ErrorKind::InvalidData => LibraryError::InvalidUtf8(path.display().to_string()),
            _ => LibraryError::Io {
                name: path.display().to_string(),
                source: e,
            },
        })
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Loader backed by a closure returning `None` for unknown names.
pub struct FnLoader<F> {
    f: F,
}

/// Wrap a closure as a [`ResourceLoader`].
///
/// ```
/// use c4gate_library::{Library, from_fn};
///
/// let loader = from_fn(|name| Some(format!("' {name}")));
/// let library = Library::load(&loader).unwrap();
/// assert!(library.core().starts_with("' c4.puml"));
/// ```
pub fn from_fn<F>(f: F) -> FnLoader<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    FnLoader { f }
}

impl<F> ResourceLoader for FnLoader<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn load(&self, name: &str) -> Result<String, LibraryError> {
        (self.f)(name).ok_or_else(|| LibraryError::NotFound(name.to_owned()))
    }

    fn describe(&self) -> String {
        "custom".to_owned()
    }
}
