//! Configuration loading, validation, and management for agentloops.
//!
//! Loads configuration from `~/.agentloops/config.toml` with environment
//! variable overrides. Validates all settings at startup.
//!
//! Every loop bound (step cap, iteration cap) has a default here and only
//! here; the loops themselves always take the bound as an explicit argument.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.agentloops/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the LLM endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// HTTP timeout per LLM call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Stream completions and concatenate the deltas
    #[serde(default = "default_true")]
    pub stream: bool,

    /// Maximum tokens per LLM response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Reason-act loop settings
    #[serde(default)]
    pub react: ReactConfig,

    /// Plan-then-execute loop settings
    #[serde(default)]
    pub plan: PlanConfig,

    /// Generate-reflect-refine loop settings
    #[serde(default)]
    pub reflection: ReflectionConfig,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_true() -> bool {
    true
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
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("stream", &self.stream)
            .field("max_tokens", &self.max_tokens)
            .field("react", &self.react)
            .field("plan", &self.plan)
            .field("reflection", &self.reflection)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactConfig {
    /// Hard cap on think/act/observe cycles
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    #[serde(default = "default_react_temperature")]
    pub temperature: f32,
}

fn default_max_steps() -> usize {
    5
}
fn default_react_temperature() -> f32 {
    0.5
}

impl Default for ReactConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            temperature: default_react_temperature(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    #[serde(default = "default_planner_temperature")]
    pub planner_temperature: f32,

    #[serde(default = "default_executor_temperature")]
    pub executor_temperature: f32,
}

fn default_planner_temperature() -> f32 {
    0.7
}
fn default_executor_temperature() -> f32 {
    0.5
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            planner_temperature: default_planner_temperature(),
            executor_temperature: default_executor_temperature(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionConfig {
    /// Cap on reflect/refine rounds after the initial attempt
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    #[serde(default = "default_reflection_temperature")]
    pub temperature: f32,

    /// Case-insensitive phrases that end refinement when a critique contains one
    #[serde(default = "default_stop_phrases")]
    pub stop_phrases: Vec<String>,
}

fn default_max_iterations() -> usize {
    3
}
fn default_reflection_temperature() -> f32 {
    0.7
}
fn default_stop_phrases() -> Vec<String> {
    vec!["无需改进".into(), "no need for improvement".into()]
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            temperature: default_reflection_temperature(),
            stop_phrases: default_stop_phrases(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.agentloops/config.toml).
    ///
    /// Environment variables take priority over the file:
    /// - `AGENTLOOPS_API_KEY`, then `OPENAI_API_KEY`
    /// - `OPENAI_BASE_URL`
    /// - `LLM_MODEL_ID`
    /// - `LLM_TIMEOUT` (seconds)
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
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

    /// Apply environment overrides through `lookup`, then re-validate.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("AGENTLOOPS_API_KEY").or_else(|| non_empty("OPENAI_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(url) = non_empty("OPENAI_BASE_URL") {
            self.base_url = url;
        }
        if let Some(model) = non_empty("LLM_MODEL_ID") {
            self.model = model;
        }
        if let Some(timeout) = non_empty("LLM_TIMEOUT") {
            self.timeout_secs = timeout.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("LLM_TIMEOUT is not a number: {timeout}"))
            })?;
        }

        self.validate()
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".agentloops")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let temperatures = [
            ("react.temperature", self.react.temperature),
            ("plan.planner_temperature", self.plan.planner_temperature),
            ("plan.executor_temperature", self.plan.executor_temperature),
            ("reflection.temperature", self.reflection.temperature),
        ];
        for (name, value) in temperatures {
            if !(0.0..=2.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be between 0.0 and 2.0"
                )));
            }
        }

        if self.react.max_steps == 0 {
            return Err(ConfigError::ValidationError(
                "react.max_steps must be > 0".into(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be > 0".into(),
            ));
        }

        if self.reflection.stop_phrases.is_empty()
            || self
                .reflection
                .stop_phrases
                .iter()
                .any(|p| p.trim().is_empty())
        {
            return Err(ConfigError::ValidationError(
                "reflection.stop_phrases must be non-empty and contain no blank phrases".into(),
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
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            stream: true,
            max_tokens: None,
            react: ReactConfig::default(),
            plan: PlanConfig::default(),
            reflection: ReflectionConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
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

impl From<ConfigError> for agentloops_core::Error {
    fn from(e: ConfigError) -> Self {
        agentloops_core::Error::Config {
            message: e.to_string(),
        }
    }
}
