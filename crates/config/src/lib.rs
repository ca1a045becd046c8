//! Configuration loading, validation, and management for PersonaChat.
//!
//! Loads configuration from `personachat.toml` in the working directory (or
//! an explicit path) with environment variable overrides. Validates all
//! settings at startup. Every key has a default, so a bare environment with
//! only `OPENAI_API_KEY` set is a complete configuration.

use personachat_core::persona::DEFAULT_PERSONA_NAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE: &str = "personachat.toml";

/// The root configuration structure.
///
/// Maps directly to `personachat.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the language-model endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model identifier sent with every completion request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Optional cap on tokens per completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Maximum tool rounds per visitor message
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// Timeout for a single model call, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Persona configuration
    #[serde(default)]
    pub persona: PersonaConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Push notification configuration
    #[serde(default)]
    pub notifications: NotificationConfig,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_rounds() -> u32 {
    10
}
fn default_request_timeout_secs() -> u64 {
    120
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_rounds", &self.max_rounds)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("persona", &self.persona)
            .field("gateway", &self.gateway)
            .field("notifications", &self.notifications)
            .finish()
    }
}

impl std::fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("pushover_token", &redact(&self.pushover_token))
            .field("pushover_user", &redact(&self.pushover_user))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Name the assistant speaks as
    #[serde(default = "default_persona_name")]
    pub name: String,

    /// Résumé / profile PDF, relative to the working directory
    #[serde(default = "default_resume_path")]
    pub resume_path: PathBuf,

    /// Plain-text summary, relative to the working directory
    #[serde(default = "default_summary_path")]
    pub summary_path: PathBuf,
}

fn default_persona_name() -> String {
    DEFAULT_PERSONA_NAME.into()
}
fn default_resume_path() -> PathBuf {
    PathBuf::from("me/linkedin.pdf")
}
fn default_summary_path() -> PathBuf {
    PathBuf::from("me/summary.txt")
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: default_persona_name(),
            resume_path: default_resume_path(),
            summary_path: default_summary_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "0.0.0.0".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pushover_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pushover_user: Option<String>,

    /// Timeout for one notification request, in seconds
    #[serde(default = "default_notify_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_notify_timeout_secs() -> u64 {
    10
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            pushover_token: None,
            pushover_user: None,
            timeout_secs: default_notify_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `./personachat.toml`, then apply environment
    /// overrides.
    ///
    /// Environment variables (highest priority):
    /// - `OPENAI_API_KEY` / `PERSONACHAT_API_KEY`
    /// - `PERSONACHAT_API_URL`, `PERSONACHAT_MODEL`, `PERSONACHAT_PERSONA_NAME`
    /// - `PUSHOVER_TOKEN`, `PUSHOVER_USER`
    /// - `PORT`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(Path::new(CONFIG_FILE))
    }

    /// Load from a specific file path, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path (no environment).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup function.
    ///
    /// Empty values are ignored so `FOO=` in a `.env` file does not blank a
    /// setting from the config file.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = var("PERSONACHAT_API_KEY").or_else(|| var("OPENAI_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(url) = var("PERSONACHAT_API_URL") {
            self.api_url = url;
        }
        if let Some(model) = var("PERSONACHAT_MODEL") {
            self.model = model;
        }
        if let Some(name) = var("PERSONACHAT_PERSONA_NAME") {
            self.persona.name = name;
        }
        if let Some(token) = var("PUSHOVER_TOKEN") {
            self.notifications.pushover_token = Some(token);
        }
        if let Some(user) = var("PUSHOVER_USER") {
            self.notifications.pushover_user = Some(user);
        }
        if let Some(port) = var("PORT") {
            self.gateway.port = port.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("PORT must be a port number, got '{port}'"))
            })?;
        }

        Ok(())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.max_rounds == 0 {
            return Err(ConfigError::ValidationError(
                "max_rounds must be at least 1".into(),
            ));
        }

        if self.request_timeout_secs == 0 || self.notifications.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be at least 1 second".into(),
            ));
        }

        if self.persona.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "persona.name must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            max_rounds: default_max_rounds(),
            request_timeout_secs: default_request_timeout_secs(),
            persona: PersonaConfig::default(),
            gateway: GatewayConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
