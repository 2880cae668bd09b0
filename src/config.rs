// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support for btembed
//!
//! Loads configuration from .btembedrc.toml in current directory or ~/.config/btembed/config.toml,
//! then applies `BTEMBED_*` environment overrides.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_MODEL: &str = "bridgetower-large-itm-mlm-itc";
const DEFAULT_COMMAND: &str = "bt-embedder";
const DEFAULT_ENDPOINT: &str = "https://api.predictionguard.com/embeddings";
const DEFAULT_API_KEY_ENV: &str = "PREDICTIONGUARD_API_KEY";
const DEFAULT_DUMMY_DIMENSION: usize = 512;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Embedding function implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderType {
    #[default]
    Command,
    Http,
    Dummy,
}

impl EmbeddingProviderType {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "command" => Ok(Self::Command),
            "http" => Ok(Self::Http),
            "dummy" => Ok(Self::Dummy),
            other => bail!(
                "Unsupported BTEMBED_PROVIDER '{}'. Supported values: command, http, dummy",
                other
            ),
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider type (command, http, dummy)
    pub provider: Option<EmbeddingProviderType>,
    /// Model identifier sent to the provider
    pub model: Option<String>,
    /// Command to execute for command provider
    pub command: Option<String>,
    /// Endpoint URL for http provider
    pub endpoint: Option<String>,
    /// Environment variable holding the http provider's API key
    pub api_key_env: Option<String>,
    /// Vector dimension for dummy provider
    pub dimension: Option<usize>,
    /// Request timeout for http provider
    pub timeout_secs: Option<u64>,
}

impl EmbeddingConfig {
    /// Get provider type (defaults to Command)
    pub fn provider(&self) -> EmbeddingProviderType {
        self.provider.unwrap_or_default()
    }

    /// Get model identifier (defaults to "bridgetower-large-itm-mlm-itc")
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Get command (defaults to "bt-embedder")
    pub fn command(&self) -> &str {
        self.command.as_deref().unwrap_or(DEFAULT_COMMAND)
    }

    /// Get endpoint (defaults to the PredictionGuard embeddings endpoint)
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Get API key variable name (defaults to PREDICTIONGUARD_API_KEY)
    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV)
    }

    /// Get dummy dimension (defaults to 512)
    pub fn dimension(&self) -> usize {
        self.dimension.unwrap_or(DEFAULT_DUMMY_DIMENSION)
    }

    /// Get http timeout (defaults to 60 seconds)
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

/// Configuration loaded from .btembedrc.toml or ~/.config/btembed/config.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether to draw a progress bar for pair batches
    pub progress: Option<bool>,

    /// Embedding configuration
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
}

impl Config {
    /// Load configuration from files
    ///
    /// Precedence (highest to lowest):
    /// 1. .btembedrc.toml in current directory
    /// 2. ~/.config/btembed/config.toml
    pub fn load() -> Self {
        if let Some(config) = Self::load_from_path(Path::new(".btembedrc.toml")) {
            return config;
        }

        if let Some(config_path) = Self::user_config_path() {
            if let Some(config) = Self::load_from_path(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    /// Load an explicitly named config file; unlike [`Config::load`], failures are errors.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn load_from_path(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Apply `BTEMBED_*` environment overrides on top of file values.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(raw) = read_env("BTEMBED_PROVIDER")? {
            self.embeddings.provider = Some(EmbeddingProviderType::parse(&raw)?);
        }
        if let Some(raw) = read_env("BTEMBED_MODEL")? {
            self.embeddings.model = Some(raw);
        }
        if let Some(raw) = read_env("BTEMBED_COMMAND")? {
            self.embeddings.command = Some(raw);
        }
        if let Some(raw) = read_env("BTEMBED_ENDPOINT")? {
            self.embeddings.endpoint = Some(raw);
        }
        if let Some(raw) = read_env("BTEMBED_PROGRESS")? {
            self.progress = Some(parse_bool("BTEMBED_PROGRESS", &raw)?);
        }
        Ok(self)
    }

    /// Get progress setting (defaults to true)
    pub fn progress(&self) -> bool {
        self.progress.unwrap_or(true)
    }

    /// Get the embedding configuration
    pub fn embeddings(&self) -> &EmbeddingConfig {
        &self.embeddings
    }

    /// Default location of the user-level config file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("btembed").join("config.toml"))
    }
}

fn read_env(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(raw) => {
            let value = raw.trim();
            if value.is_empty() {
                Ok(None)
            } else {
                Ok(Some(value.to_string()))
            }
        }
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err).with_context(|| format!("Failed to read {}", name)),
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("Invalid {} value: {}", name, other),
    }
}
