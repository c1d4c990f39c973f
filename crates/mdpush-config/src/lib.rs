//! Configuration management for mdpush.
//!
//! Parses `mdpush.toml` configuration files with serde and provides
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
//! - `remote.endpoint`
//! - `remote.authorization`
//! - `source.base_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the GraphQL endpoint.
    pub endpoint: Option<String>,
    /// Override the document glob.
    pub files: Option<String>,
    /// Override the base URL prefix for relative links.
    pub base_url: Option<String>,
    /// Override the default language.
    pub language: Option<String>,
    /// Override the default publish flag.
    pub publish: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdpush.toml";

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote content repository (optional section, required for `sync`).
    pub remote: Option<RemoteConfig>,
    /// Defaults applied when a document's frontmatter omits them.
    pub defaults: DefaultsConfig,
    /// Source document discovery.
    pub source: SourceConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Remote content repository configuration.
#[derive(Debug, Deserialize)]
pub struct RemoteConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,
    /// Value sent verbatim as the `Authorization` header.
    #[serde(default)]
    pub authorization: Option<String>,
    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RemoteConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.endpoint, "remote.endpoint")?;
        require_http_url(&self.endpoint, "remote.endpoint")?;
        if let Some(authorization) = &self.authorization {
            require_non_empty(authorization, "remote.authorization")?;
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "remote.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Per-document defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Language used when the frontmatter has no `language` field.
    pub language: String,
    /// Publish flag used when the frontmatter has no `publish` field.
    pub publish: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            language: "en".to_owned(),
            publish: false,
        }
    }
}

/// Source document discovery configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Glob pattern selecting the markdown documents.
    pub files: String,
    /// URL prefix joined with each document's relative path to resolve
    /// relative image sources. Falls back to the document's `file://` URL.
    pub base_url: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            files: "**/*.md".to_owned(),
            base_url: None,
        }
    }
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
        /// Config field path (e.g., "`remote.authorization`").
        field: String,
        /// Error message (e.g., "${`MDPUSH_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
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
    /// Otherwise, searches for `mdpush.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, so CLI arguments take
    /// precedence over config file values. The merged result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails
    /// or the merged configuration is invalid.
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
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(endpoint) = &settings.endpoint {
            match &mut self.remote {
                Some(remote) => remote.endpoint.clone_from(endpoint),
                None => {
                    self.remote = Some(RemoteConfig {
                        endpoint: endpoint.clone(),
                        authorization: None,
                        timeout_secs: DEFAULT_TIMEOUT_SECS,
                    });
                }
            }
        }
        if let Some(files) = &settings.files {
            self.source.files.clone_from(files);
        }
        if let Some(base_url) = &settings.base_url {
            self.source.base_url = Some(base_url.clone());
        }
        if let Some(language) = &settings.language {
            self.defaults.language.clone_from(language);
        }
        if let Some(publish) = settings.publish {
            self.defaults.publish = publish;
        }
    }

    /// Get validated remote configuration.
    ///
    /// Use this instead of accessing the `remote` field directly when the
    /// command talks to the content repository.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_remote(&self) -> Result<&RemoteConfig, ConfigError> {
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| ConfigError::Validation("[remote] section required in config".into()))?;
        remote.validate()?;
        Ok(remote)
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

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// The `[remote]` section is only checked by [`require_remote`](Self::require_remote),
    /// so offline commands work without credentials.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.defaults.language, "defaults.language")?;
        require_non_empty(&self.source.files, "source.files")?;
        if let Some(base_url) = &self.source.base_url {
            require_http_url(base_url, "source.base_url")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut remote) = self.remote {
            remote.endpoint = expand::expand_env(&remote.endpoint, "remote.endpoint")?;
            if let Some(ref authorization) = remote.authorization {
                remote.authorization =
                    Some(expand::expand_env(authorization, "remote.authorization")?);
            }
        }

        if let Some(ref base_url) = self.source.base_url {
            self.source.base_url = Some(expand::expand_env(base_url, "source.base_url")?);
        }

        Ok(())
    }
}
