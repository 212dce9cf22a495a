//! CLI command implementations.

pub(crate) mod sanitize;
pub(crate) mod serve;

pub(crate) use sanitize::SanitizeArgs;
pub(crate) use serve::ServeArgs;
