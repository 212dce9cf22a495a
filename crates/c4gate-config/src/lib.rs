//! Configuration management for c4gate.
//!
//! Parses `c4gate.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `security.safe_mode`
//! - `renderer.kroki_url`
//! - `library.dir`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override rendering engine URL.
    pub kroki_url: Option<String>,
    /// Override safe mode.
    pub safe_mode: Option<String>,
    /// Override library resource directory.
    pub library_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "c4gate.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Security configuration.
    pub security: SecurityConfig,
    /// Rendering engine configuration.
    pub renderer: RendererConfig,
    /// Library configuration (paths are relative strings from TOML).
    library: LibraryConfigRaw,

    /// Resolved library directory (`None` uses the embedded library).
    #[serde(skip)]
    pub library_dir: Option<PathBuf>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

/// Security configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Safe mode name (`secure`, `safe` or `unsafe`).
    ///
    /// Kept as written; unrecognized names fall back to `secure` when the
    /// server starts.
    pub safe_mode: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            safe_mode: "secure".to_owned(),
        }
    }
}

/// Rendering engine configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Kroki server URL.
    pub kroki_url: String,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            kroki_url: "https://kroki.io".to_owned(),
            timeout_secs: 30,
        }
    }
}

impl RendererConfig {
    /// HTTP timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Raw library configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct LibraryConfigRaw {
    dir: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`renderer.kroki_url`").
        field: String,
        /// Error message (e.g., "${`KROKI_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `c4gate.toml` in current directory and parents,
    /// and falls back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, so they take precedence over
    /// config file values, and the result is validated again.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(kroki_url) = &settings.kroki_url {
            self.renderer.kroki_url.clone_from(kroki_url);
        }
        if let Some(safe_mode) = &settings.safe_mode {
            self.security.safe_mode.clone_from(safe_mode);
        }
        if let Some(library_dir) = &settings.library_dir {
            self.library_dir = Some(library_dir.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_renderer()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate rendering engine configuration.
    fn validate_renderer(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.renderer.kroki_url, "renderer.kroki_url")?;
        require_http_url(&self.renderer.kroki_url, "renderer.kroki_url")?;

        if self.renderer.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "renderer.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.security.safe_mode =
            expand::expand_env(&self.security.safe_mode, "security.safe_mode")?;
        self.renderer.kroki_url =
            expand::expand_env(&self.renderer.kroki_url, "renderer.kroki_url")?;

        if let Some(ref dir) = self.library.dir {
            self.library.dir = Some(expand::expand_env(dir, "library.dir")?);
        }

        Ok(())
    }

    /// Resolve relative paths against the config file directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.library_dir = self.library.dir.as_deref().map(|dir| config_dir.join(dir));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.security.safe_mode, "secure");
        assert_eq!(config.renderer.kroki_url, "https://kroki.io");
        assert_eq!(config.renderer.timeout(), Duration::from_secs(30));
        assert!(config.library_dir.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.security.safe_mode, "secure");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000

[security]
safe_mode = "unsafe"

[renderer]
kroki_url = "http://kroki:8000"
timeout_secs = 5

[library]
dir = "c4"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.security.safe_mode, "unsafe");
        assert_eq!(config.renderer.kroki_url, "http://kroki:8000");
        assert_eq!(config.renderer.timeout(), Duration::from_secs(5));
        assert_eq!(config.library_dir, Some(PathBuf::from("/project/c4")));
    }

    #[test]
    fn test_unknown_safe_mode_is_not_a_parse_error() {
        let toml = r#"
[security]
safe_mode = "whatever"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.security.safe_mode, "whatever");
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_port_zero() {
        let mut config = Config::default();
        config.server.port = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut config = Config::default();
        config.renderer.kroki_url = "kroki:8000".to_owned();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("renderer.kroki_url"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.renderer.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        let overrides = CliSettings {
            port: Some(9000),
            safe_mode: Some("unsafe".to_owned()),
            library_dir: Some(PathBuf::from("/opt/c4")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1"); // Unchanged
        assert_eq!(config.security.safe_mode, "unsafe");
        assert_eq!(config.library_dir, Some(PathBuf::from("/opt/c4")));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.renderer.kroki_url, "https://kroki.io");
        assert_eq!(config.security.safe_mode, "secure");
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("c4gate.toml");
        std::fs::write(
            &path,
            "[renderer]\nkroki_url = \"http://localhost:8000\"\n\n[library]\ndir = \"lib\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.renderer.kroki_url, "http://localhost:8000");
        assert_eq!(config.library_dir, Some(temp_dir.path().join("lib")));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/c4gate.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("c4gate.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_validates_cli_overrides() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("c4gate.toml");
        std::fs::write(&path, "").unwrap();

        let overrides = CliSettings {
            kroki_url: Some("ftp://kroki".to_owned()),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();
        assert!(err.to_string().contains("renderer.kroki_url"));
    }

    #[test]
    fn test_expand_env_vars_safe_mode() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("C4GATE_TEST_SAFE_MODE", "unsafe");
        }

        let toml = r#"
[security]
safe_mode = "${C4GATE_TEST_SAFE_MODE}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.security.safe_mode, "unsafe");

        unsafe {
            std::env::remove_var("C4GATE_TEST_SAFE_MODE");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("C4GATE_TEST_MISSING_URL");
        }

        let toml = r#"
[renderer]
kroki_url = "${C4GATE_TEST_MISSING_URL}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("renderer.kroki_url"));
    }
}
