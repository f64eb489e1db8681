//! Configuration management for c2b.
//!
//! Parses `c2b.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values in the `[bookstack]` section support environment variable
//! expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! ## Example
//!
//! ```toml
//! [source]
//! path = "export"
//!
//! [bookstack]
//! base_url = "${BOOKSTACK_URL}"
//! token_id = "${BOOKSTACK_TOKEN_ID}"
//! token_secret = "${BOOKSTACK_TOKEN_SECRET}"
//!
//! [migration]
//! attachments = true
//! ```

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override export source directory.
    pub source_path: Option<PathBuf>,
    /// Override BookStack base URL.
    pub base_url: Option<String>,
    /// Override API token id.
    pub token_id: Option<String>,
    /// Override API token secret.
    pub token_secret: Option<String>,
    /// Override attachment processing flag.
    pub attachments: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "c2b.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Export source configuration (path is a relative string from TOML).
    #[serde(rename = "source")]
    source_raw: SourceConfigRaw,
    /// BookStack connection (optional section, required by commands that talk to the API).
    pub bookstack: Option<BookStackConfig>,
    /// Migration behavior.
    pub migration: MigrationConfig,

    /// Resolved export source directory (set after loading, `None` when
    /// neither the config file nor the CLI names one).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_raw: SourceConfigRaw::default(),
            bookstack: None,
            migration: MigrationConfig::default(),
            source_path: None,
            config_path: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SourceConfigRaw {
    path: Option<String>,
}

/// BookStack API connection settings.
#[derive(Debug, Deserialize)]
pub struct BookStackConfig {
    /// BookStack instance URL (without the `/api` suffix).
    #[serde(default)]
    pub base_url: String,
    /// API token id.
    #[serde(default)]
    pub token_id: String,
    /// API token secret.
    #[serde(default)]
    pub token_secret: String,
    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BookStackConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token_id: String::new(),
            token_secret: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BookStackConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "bookstack.base_url")?;
        require_http_url(&self.base_url, "bookstack.base_url")?;
        require_non_empty(&self.token_id, "bookstack.token_id")?;
        require_non_empty(&self.token_secret, "bookstack.token_secret")?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "bookstack.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Migration behavior.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Re-host images, PDFs and listed attachments on the created pages.
    pub attachments: bool,
    /// Value of the `Source` tag put on every created object.
    pub source_tag: String,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            attachments: false,
            source_tag: "Confluence".to_owned(),
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
        /// Config field path (e.g., "`bookstack.token_id`").
        field: String,
        /// Error message (e.g., "${`BOOKSTACK_TOKEN_ID`} not set").
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
    /// Otherwise, searches for `c2b.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
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
        if let Some(source_path) = &settings.source_path {
            self.source_path = Some(source_path.clone());
        }
        if settings.base_url.is_some()
            || settings.token_id.is_some()
            || settings.token_secret.is_some()
        {
            let bookstack = self.bookstack.get_or_insert_with(BookStackConfig::default);
            if let Some(base_url) = &settings.base_url {
                bookstack.base_url.clone_from(base_url);
            }
            if let Some(token_id) = &settings.token_id {
                bookstack.token_id.clone_from(token_id);
            }
            if let Some(token_secret) = &settings.token_secret {
                bookstack.token_secret.clone_from(token_secret);
            }
        }
        if let Some(attachments) = settings.attachments {
            self.migration.attachments = attachments;
        }
    }

    /// Get validated BookStack configuration.
    ///
    /// Use this instead of accessing the `bookstack` field directly when the
    /// command needs to talk to the API.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_bookstack(&self) -> Result<&BookStackConfig, ConfigError> {
        let bookstack = self.bookstack.as_ref().ok_or_else(|| {
            ConfigError::Validation(
                "BookStack connection required ([bookstack] section, --url or BOOKSTACK_URL)"
                    .into(),
            )
        })?;
        bookstack.validate()?;
        Ok(bookstack)
    }

    /// Get the export source directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if neither the CLI nor `[source] path`
    /// names one.
    pub fn require_source(&self) -> Result<&Path, ConfigError> {
        self.source_path.as_deref().ok_or_else(|| {
            ConfigError::Validation(
                "export source directory required (SOURCE argument or [source] path)".to_owned(),
            )
        })
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

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// The `[bookstack]` section is only checked by [`Config::require_bookstack`],
    /// since offline commands (e.g. a dry run) do not need it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.migration.source_tag, "migration.source_tag")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut bookstack) = self.bookstack {
            bookstack.base_url = expand::expand_env(&bookstack.base_url, "bookstack.base_url")?;
            bookstack.token_id = expand::expand_env(&bookstack.token_id, "bookstack.token_id")?;
            bookstack.token_secret =
                expand::expand_env(&bookstack.token_secret, "bookstack.token_secret")?;
        }
        Ok(())
    }

    /// Resolve the source path relative to the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.source_path = self.source_raw.path.as_ref().map(|path| config_dir.join(path));
    }
}
