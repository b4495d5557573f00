//! Application configuration module
//!
//! This module handles the application configuration including loading,
//! validating and saving configuration settings.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::ConfigError;
use crate::validation::ValidationConfig;

/// Environment variable that overrides the stored API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Correction provider config
    #[serde(default)]
    pub llm: LlmConfig,

    /// Validation config
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Correction provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CorrectionProvider {
    // @provider: OpenAI
    #[default]
    OpenAI,
    // @provider: LM Studio (OpenAI-compatible local server)
    LMStudio,
}

impl CorrectionProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::LMStudio => "LM Studio",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::LMStudio => "lmstudio".to_string(),
        }
    }

    // @returns: Whether requests need an API key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAI)
    }

    fn default_endpoint(&self) -> String {
        match self {
            Self::OpenAI => "https://api.openai.com/v1".to_string(),
            Self::LMStudio => "http://localhost:1234/v1".to_string(),
        }
    }
}

impl std::fmt::Display for CorrectionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for CorrectionProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "lmstudio" => Ok(Self::LMStudio),
            _ => Err(ConfigError::InvalidValue {
                field: "provider",
                message: format!("unknown provider '{}'", s),
            }),
        }
    }
}

/// Settings of the correction provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LlmConfig {
    // @field: Provider type identifier
    #[serde(default)]
    pub provider: CorrectionProvider,

    // @field: Model name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: API key
    #[serde(default)]
    pub api_key: String,

    // @field: Service URL, empty for the provider default
    #[serde(default)]
    pub endpoint: String,

    // @field: Timeout seconds per request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Retries after the first attempt
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    // @field: Base backoff, doubled per retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    // @field: Fixes below this are only suggested
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    // @field: Token edit distance above which a fix is rejected
    #[serde(default = "default_max_edit_distance")]
    pub max_edit_distance: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: CorrectionProvider::default(),
            model: default_model(),
            api_key: String::new(),
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: 0.0,
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            min_confidence: default_min_confidence(),
            max_edit_distance: default_max_edit_distance(),
        }
    }
}

impl LlmConfig {
    /// Get the endpoint, falling back to the provider default
    pub fn get_endpoint(&self) -> String {
        if self.endpoint.is_empty() {
            self.provider.default_endpoint()
        } else {
            self.endpoint.clone()
        }
    }

    /// Upper bound for one chunk: every attempt plus every backoff
    pub fn chunk_timeout(&self) -> Duration {
        let attempts = u64::from(self.retry_count) + 1;
        let backoff = (0..self.retry_count)
            .map(|i| backoff_delay_ms(self.retry_backoff_ms, i))
            .fold(0u64, u64::saturating_add);
        Duration::from_secs(self.timeout_secs.saturating_mul(attempts))
            .saturating_add(Duration::from_millis(backoff))
    }
}

/// Delay before retry number `retry` (0-based): `base_ms * 2^retry`, saturating.
pub fn backoff_delay_ms(base_ms: u64, retry: u32) -> u64 {
    base_ms.saturating_mul(1u64.checked_shl(retry).unwrap_or(u64::MAX))
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(ConfigError::InvalidValue {
                field: "log_level",
                message: format!("unknown level '{}'", s),
            }),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Upper bound accepted for `retry_count`
pub const MAX_RETRY_COUNT: u32 = 10;

fn default_retry_count() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_top_p() -> f32 {
    0.1
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_min_confidence() -> f64 {
    0.8
}

fn default_max_edit_distance() -> usize {
    8
}

/// Show a key as `first8...last4`; short keys are fully hidden.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 12 {
        let head: String = chars[..8].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "***".to_string()
    }
}

impl Config {
    /// `~/.screenplay_formatter/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".screenplay_formatter").join("config.json"))
    }

    /// Load from `path`. A missing or unreadable file yields the defaults.
    pub fn load(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            debug!("No config at {:?}, using defaults", path);
            return Self::default();
        };

        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring corrupt config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::File(format!("Cannot create {:?}: {}", parent, e)))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::File(format!("Cannot serialize config: {}", e)))?;
        fs::write(path, json).map_err(|e| ConfigError::File(format!("Cannot write {:?}: {}", path, e)))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let llm = &self.llm;
        if !(0.0..=1.0).contains(&llm.min_confidence) {
            return Err(invalid("min_confidence", format!("{} is outside [0, 1]", llm.min_confidence)));
        }
        if !(0.0..=2.0).contains(&llm.temperature) {
            return Err(invalid("temperature", format!("{} is outside [0, 2]", llm.temperature)));
        }
        if !(llm.top_p > 0.0 && llm.top_p <= 1.0) {
            return Err(invalid("top_p", format!("{} is outside (0, 1]", llm.top_p)));
        }
        if llm.max_tokens == 0 {
            return Err(invalid("max_tokens", "must be positive".to_string()));
        }
        if llm.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be positive".to_string()));
        }
        if llm.retry_count > MAX_RETRY_COUNT {
            return Err(invalid("retry_count", format!("{} exceeds {}", llm.retry_count, MAX_RETRY_COUNT)));
        }
        if llm.model.trim().is_empty() {
            return Err(invalid("model", "must not be empty".to_string()));
        }
        Ok(())
    }

    /// The environment key if set, else the stored one.
    pub fn resolve_api_key_with(&self, env_key: Option<String>) -> Option<String> {
        env_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| Some(self.llm.api_key.clone()).filter(|k| !k.trim().is_empty()))
    }

    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(std::env::var(API_KEY_ENV).ok())
    }

    /// The key to use for requests, checked once before any correction.
    /// Providers that do not need a key get an empty one.
    pub fn require_api_key_with(&self, env_key: Option<String>) -> Result<String, ConfigError> {
        match self.resolve_api_key_with(env_key) {
            Some(key) => Ok(key),
            None if !self.llm.provider.requires_api_key() => Ok(String::new()),
            None => Err(ConfigError::MissingApiKey(API_KEY_ENV)),
        }
    }

    pub fn require_api_key(&self) -> Result<String, ConfigError> {
        self.require_api_key_with(std::env::var(API_KEY_ENV).ok())
    }

    pub fn set_api_key(&mut self, key: &str) {
        self.llm.api_key = key.trim().to_string();
    }

    pub fn remove_api_key(&mut self) {
        self.llm.api_key.clear();
    }

    pub fn set_model(&mut self, model: &str) -> Result<(), ConfigError> {
        if model.trim().is_empty() {
            return Err(invalid("model", "must not be empty".to_string()));
        }
        self.llm.model = model.trim().to_string();
        Ok(())
    }

    /// Default confidence threshold for auto-applying fixes
    pub fn set_confidence(&mut self, confidence: f64) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(invalid("confidence", format!("{} is outside [0, 1]", confidence)));
        }
        self.llm.min_confidence = confidence;
        Ok(())
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.validation.strict = strict;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Human-readable settings with the key masked
    pub fn show_with(&self, path: &Path, env_key: Option<String>) -> String {
        let env_set = env_key.as_deref().is_some_and(|k| !k.trim().is_empty());
        let api_key = match self.resolve_api_key_with(env_key) {
            Some(key) if env_set => format!("{} (from {})", mask_api_key(&key), API_KEY_ENV),
            Some(key) => mask_api_key(&key),
            None => "Not set".to_string(),
        };

        [
            "Current Configuration:".to_string(),
            format!("  Provider: {}", self.llm.provider.display_name()),
            format!("  Model: {}", self.llm.model),
            format!("  API Key: {}", api_key),
            format!("  Endpoint: {}", self.llm.get_endpoint()),
            format!("  Default confidence: {:.2}", self.llm.min_confidence),
            format!("  Max edit distance: {}", self.llm.max_edit_distance),
            format!("  Strict validation: {}", self.validation.strict),
            format!("  Log level: {}", self.log_level.as_str()),
            String::new(),
            format!("Config file: {}", path.display()),
        ]
        .join("\n")
    }

    pub fn show(&self, path: &Path) -> String {
        self.show_with(path, std::env::var(API_KEY_ENV).ok())
    }
}

fn invalid(field: &'static str, message: String) -> ConfigError {
    ConfigError::InvalidValue { field, message }
}
