//! `${VAR}` references in `c4gate.toml` values.
//!
//! Lets deployments keep the Kroki URL, bind host or safe mode in the
//! environment, e.g. `kroki_url = "${KROKI_URL:-https://kroki.io}"`.

use std::borrow::Cow;

use crate::ConfigError;

/// Replace `${VAR}` and `${VAR:-fallback}` references in `value`.
///
/// `field` names the config key in the error when a referenced variable is
/// unset and has no fallback. Plain `$VAR` is left alone, so URLs containing
/// a dollar sign survive untouched.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, lookup)
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.cause.0),
        })
}

/// Read one variable; a missing one is an error carrying its name.
fn lookup(var: &str) -> Result<Option<String>, UnsetVar> {
    std::env::var(var)
        .map(Some)
        .map_err(|_| UnsetVar(var.to_owned()))
}

/// Name of an unset environment variable.
struct UnsetVar(String);
