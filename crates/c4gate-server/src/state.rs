//! Application state.
//!
//! Shared state for all request handlers. Built once before the listener
//! binds and never mutated afterwards.

use c4gate_diagrams::C4PlantUml;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// C4-PlantUML service (library bundles, safe mode, rendering engine).
    pub(crate) c4plantuml: C4PlantUml,
    /// Application version for `ETag` computation.
    pub(crate) version: String,
    /// Hash of the loaded library bundles for `ETag` computation.
    pub(crate) library_fingerprint: String,
}
