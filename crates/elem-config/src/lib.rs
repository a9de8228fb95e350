//! Configuration management for elem.
//!
//! Parses `elem.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ```toml
//! [render]
//! pretty = true
//! indent = "    "
//! collapse_leaves = true
//!
//! [demo]
//! page = "form"
//! lang = "en"
//! title = "elem demo"
//! output = "out/demo.html"
//! ```
//!
//! CLI settings can be applied during load via [`CliSettings`].

use std::path::{Path, PathBuf};

use elem::PrettyConfig;
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "elem.toml";

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override pretty-printing.
    pub pretty: Option<bool>,
    /// Override the demo page name.
    pub page: Option<String>,
    /// Override the output file.
    pub output: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serialization settings.
    pub render: RenderConfig,
    /// Demo page settings.
    pub demo: DemoConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Serialization settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Pretty-print output.
    pub pretty: bool,
    /// Indentation and leaf layout used when pretty-printing.
    #[serde(flatten)]
    pub layout: PrettyConfig,
}

/// Demo page settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Demo page to render.
    pub page: String,
    /// `lang` attribute of the page root.
    pub lang: String,
    /// Page title.
    pub title: String,
    /// Output file. Relative paths resolve against the config file directory.
    pub output: Option<PathBuf>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            page: "basic".to_owned(),
            lang: "en".to_owned(),
            title: "elem demo".to_owned(),
            output: None,
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
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `elem.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied last and take precedence over file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the loaded values are invalid.
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
            tracing::debug!("No config file found, using defaults");
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(pretty) = settings.pretty {
            self.render.pretty = pretty;
        }
        if let Some(page) = &settings.page {
            self.demo.page.clone_from(page);
        }
        if let Some(output) = &settings.output {
            self.demo.output = Some(output.clone());
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

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }

    /// Resolve relative paths against the config file directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        if let Some(output) = &self.demo.output
            && output.is_relative()
        {
            self.demo.output = Some(config_dir.join(output));
        }
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_render()?;
        require_non_empty(&self.demo.page, "demo.page")?;
        require_non_empty(&self.demo.lang, "demo.lang")?;
        Ok(())
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        let indent = &self.render.layout.indent;
        require_non_empty(indent, "render.indent")?;
        if !indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(ConfigError::Validation(
                "render.indent may only contain spaces and tabs".to_owned(),
            ));
        }
        Ok(())
    }
}
