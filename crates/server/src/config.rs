//! # Application Configuration
//!
//! This module defines the configuration structure for the `uroki-server`
//! and provides the logic for loading it from a `config.yml` file and
//! environment variables. Values in the YAML file may reference environment
//! variables with `${VAR}` syntax.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use tracing::info;
use uroki::prompts::{PERSONALIZE_SYSTEM_PROMPT, PERSONALIZE_USER_PROMPT};

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The path to the SQLite database file. Loaded from `DB_URL` env var.
    #[serde(default = "default_db_url")]
    pub db_url: String,
    /// A map of named, reusable AI provider configurations.
    pub providers: HashMap<String, ProviderConfig>,
    /// The generation task: which provider to use and optional prompt
    /// overrides.
    #[serde(default)]
    pub generation: GenerationConfig,
}

fn default_port() -> u16 {
    9191
}

fn default_db_url() -> String {
    "db/uroki.db".to_string()
}

/// A reusable configuration for a specific AI provider instance.
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// The type of provider (e.g., "gemini", "local").
    pub provider: String,
    /// The API URL. Optional for providers like Gemini where it can be derived.
    pub api_url: Option<String>,
    /// The API key, which can be null for local providers.
    pub api_key: Option<String>,
    pub model_name: String,
}

/// Defines the provider and prompts for the personalization task.
#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    /// The key of the provider to use from the `providers` map.
    #[serde(default = "default_generation_provider")]
    pub provider: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_user_prompt")]
    pub user_prompt: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_generation_provider(),
            system_prompt: default_system_prompt(),
            user_prompt: default_user_prompt(),
        }
    }
}

fn default_generation_provider() -> String {
    "default".to_string()
}

fn default_system_prompt() -> String {
    PERSONALIZE_SYSTEM_PROMPT.to_string()
}

fn default_user_prompt() -> String {
    PERSONALIZE_USER_PROMPT.to_string()
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_else(|_| "".to_string())
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// The configuration is layered: the YAML file (with `${VAR}` substitution)
/// forms the base, then environment variables override top-level keys like
/// `PORT` and `DB_URL`, and `UROKI_`-prefixed variables override nested keys
/// (e.g. `UROKI_GENERATION__PROVIDER`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let config_path = match config_path_override {
        Some(path) => path.to_string(),
        None => format!("{}/config.yml", env!("CARGO_MANIFEST_DIR")),
    };
    info!("Loading configuration from '{config_path}'.");

    let content = read_and_substitute(&config_path)?.ok_or_else(|| {
        ConfigError::NotFound(format!(
            "Config file not found at '{config_path}'. Copy 'config.example.yml' to 'config.yml' and fill in your provider settings."
        ))
    })?;

    let settings = ConfigBuilder::builder()
        .add_source(File::from_str(&content, FileFormat::Yaml))
        // Environment variables for top-level keys like PORT and DB_URL.
        .add_source(Environment::default())
        // Prefixed environment variables for deeper overrides.
        .add_source(
            Environment::with_prefix("UROKI")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
