//! Configuration management for probe.
//!
//! Parses `probe.toml` with serde and discovers it in the working directory
//! or its parents. CLI settings are applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `app.manifest`
//! - `app.project_dir`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "probe.toml";

/// Manifest filename used when the config does not name one.
const DEFAULT_MANIFEST: &str = "app.toml";

/// Output formats accepted in `describe.format`.
const KNOWN_FORMATS: [&str; 4] = ["txt", "xml", "json", "md"];

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the application manifest.
    pub manifest: Option<PathBuf>,
    /// Override the project directory.
    pub project_dir: Option<PathBuf>,
    /// Override the output format.
    pub format: Option<String>,
    /// Override raw output.
    pub raw: Option<bool>,
    /// Override the controller column.
    pub show_controllers: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Application paths as written in TOML.
    app: AppConfigRaw,
    /// Describe defaults.
    pub describe: DescribeConfig,

    /// Resolved application paths (set after loading).
    #[serde(skip)]
    pub app_resolved: AppConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct AppConfigRaw {
    manifest: Option<String>,
    project_dir: Option<String>,
}

/// Resolved application paths.
#[derive(Debug, Default)]
pub struct AppConfig {
    /// Application manifest describing routes, listeners and services.
    pub manifest: PathBuf,
    /// Root that closure locations are shown relative to.
    pub project_dir: PathBuf,
}

/// Defaults for describe commands.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DescribeConfig {
    /// Output format name.
    pub format: String,
    /// Write output without decoration.
    pub raw: bool,
    /// Show the controller column in route tables.
    pub show_controllers: bool,
    /// JSON escaping.
    pub json: JsonConfig,
}

impl Default for DescribeConfig {
    fn default() -> Self {
        Self {
            format: "txt".to_owned(),
            raw: false,
            show_controllers: false,
            json: JsonConfig::default(),
        }
    }
}

/// JSON escaping flags.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct JsonConfig {
    /// Write `/` as `\/`.
    pub escape_slashes: bool,
    /// Write non-ASCII characters as `\uXXXX`.
    pub escape_unicode: bool,
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
        /// Config field path (e.g., "`app.project_dir`").
        field: String,
        /// Error message (e.g., "${`APP_ROOT`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `probe.toml` in the current directory and its parents, falling back
    /// to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// a value is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(manifest) = &settings.manifest {
            self.app_resolved.manifest.clone_from(manifest);
        }
        if let Some(project_dir) = &settings.project_dir {
            self.app_resolved.project_dir.clone_from(project_dir);
        }
        if let Some(format) = &settings.format {
            self.describe.format.clone_from(format);
        }
        if let Some(raw) = settings.raw {
            self.describe.raw = raw;
        }
        if let Some(show_controllers) = settings.show_controllers {
            self.describe.show_controllers = show_controllers;
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            app_resolved: AppConfig {
                manifest: base.join(DEFAULT_MANIFEST),
                project_dir: base.to_path_buf(),
            },
            ..Self::default()
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

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
        require_non_empty(&self.describe.format, "describe.format")?;
        if !KNOWN_FORMATS.contains(&self.describe.format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "describe.format must be one of {}, got \"{}\"",
                KNOWN_FORMATS.join(", "),
                self.describe.format
            )));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref manifest) = self.app.manifest {
            self.app.manifest = Some(expand::expand_env(manifest, "app.manifest")?);
        }
        if let Some(ref project_dir) = self.app.project_dir {
            self.app.project_dir = Some(expand::expand_env(project_dir, "app.project_dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve =
            |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.app_resolved = AppConfig {
            manifest: resolve(self.app.manifest.as_deref(), DEFAULT_MANIFEST),
            project_dir: resolve(self.app.project_dir.as_deref(), "."),
        };
    }
}

/// Search for `probe.toml` in `start` and its parents.
#[must_use]
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
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
