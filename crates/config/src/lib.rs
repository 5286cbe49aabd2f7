//! Configuration loading, validation, and management for Thinkloop.
//!
//! Loads configuration from `~/.thinkloop/config.toml` with environment
//! variable overrides. Validates all settings at startup and converts them
//! into the explicit [`AgentConfig`] value the agent is constructed with.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thinkloop_core::AgentConfig;

/// The root configuration structure.
///
/// Maps directly to `~/.thinkloop/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default reasoning provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per model reply
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Agent loop settings
    #[serde(default)]
    pub agent: AgentSection,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Built-in tool settings
    #[serde(default)]
    pub tools: ToolsConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4".into()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_max_tokens() -> u32 {
    1024
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
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("agent", &self.agent)
            .field("providers", &self.providers)
            .field("tools", &self.tools)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSection {
    /// Reason→act→observe cycles allowed per task
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Per-tool wall-clock limit in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_timeout_secs: Option<u64>,

    /// Per-reasoning-call wall-clock limit in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_timeout_secs: Option<u64>,
}

fn default_max_iterations() -> u32 {
    10
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tool_timeout_secs: None,
            llm_timeout_secs: None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub currency: CurrencyConfig,
}

/// Fixed exchange-rate table, every rate relative to `base`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    #[serde(default = "default_base_currency")]
    pub base: String,

    #[serde(default = "default_rates")]
    pub rates: BTreeMap<String, f64>,
}

fn default_base_currency() -> String {
    "EUR".into()
}

fn default_rates() -> BTreeMap<String, f64> {
    [
        ("EUR", 1.0),
        ("USD", 1.10),
        ("GBP", 0.85),
        ("JPY", 156.0),
        ("CHF", 0.95),
    ]
    .into_iter()
    .map(|(code, rate)| (code.to_string(), rate))
    .collect()
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            base: default_base_currency(),
            rates: default_rates(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.thinkloop/config.toml).
    ///
    /// Also checks environment variables:
    /// - `THINKLOOP_PROVIDER`
    /// - `THINKLOOP_API_KEY` and `THINKLOOP_MODEL` override every file value,
    ///   including the active provider's section
    /// - `OPENAI_API_KEY`, `OPENROUTER_API_KEY` only fill a missing key
    /// - `THINKLOOP_TEMPERATURE`, `THINKLOOP_MAX_ITERATIONS`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(&Self::config_dir().join("config.toml"))
    }

    /// Load from a specific path, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
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
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(provider) = lookup("THINKLOOP_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(key) = lookup("THINKLOOP_API_KEY") {
            if let Some(section) = self.providers.get_mut(&self.default_provider) {
                section.api_key = Some(key.clone());
            }
            self.api_key = Some(key);
        } else if self.api_key.is_none() {
            self.api_key = lookup("OPENAI_API_KEY").or_else(|| lookup("OPENROUTER_API_KEY"));
        }

        if let Some(model) = lookup("THINKLOOP_MODEL") {
            if let Some(section) = self.providers.get_mut(&self.default_provider) {
                section.default_model = Some(model.clone());
            }
            self.default_model = model;
        }

        if let Some(raw) = lookup("THINKLOOP_TEMPERATURE") {
            self.default_temperature = raw.trim().parse().map_err(|_| {
                let msg = format!("THINKLOOP_TEMPERATURE is not a number: {raw}");
                ConfigError::ValidationError(msg)
            })?;
        }

        if let Some(raw) = lookup("THINKLOOP_MAX_ITERATIONS") {
            self.agent.max_iterations = raw.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "THINKLOOP_MAX_ITERATIONS is not a positive integer: {raw}"
                ))
            })?;
        }

        self.validate()
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".thinkloop")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agent.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_iterations must be at least 1".into(),
            ));
        }

        let currency = &self.tools.currency;
        if !currency.rates.contains_key(&currency.base) {
            return Err(ConfigError::ValidationError(format!(
                "tools.currency.rates must contain the base currency {}",
                currency.base
            )));
        }
        if let Some((code, _)) = currency.rates.iter().find(|(_, rate)| **rate <= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "tools.currency.rates.{code} must be positive"
            )));
        }

        Ok(())
    }

    /// The explicit agent configuration derived from this file.
    pub fn agent_config(&self) -> AgentConfig {
        let model = self
            .providers
            .get(&self.default_provider)
            .and_then(|p| p.default_model.clone())
            .unwrap_or_else(|| self.default_model.clone());

        AgentConfig {
            model,
            temperature: self.default_temperature,
            max_tokens: Some(self.default_max_tokens),
            max_iterations: self.agent.max_iterations,
            llm_timeout_secs: self.agent.llm_timeout_secs,
        }
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            agent: AgentSection::default(),
            providers: HashMap::new(),
            tools: ToolsConfig::default(),
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

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.default_model, "gpt-4");
        assert_eq!(config.agent.max_iterations, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.default_provider, config.default_provider);
        assert_eq!(parsed.tools.currency.rates, config.tools.currency.rates);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            default_temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_iterations_rejected() {
        let mut config = AppConfig::default();
        config.agent.max_iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn currency_base_must_be_in_table() {
        let mut config = AppConfig::default();
        config.tools.currency.base = "XYZ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.default_provider, "openai");
    }

    #[test]
    fn loads_file_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_model = "gpt-4o-mini"

[agent]
max_iterations = 4
tool_timeout_secs = 5

[tools.currency]
base = "USD"
[tools.currency.rates]
USD = 1.0
EUR = 0.9
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.default_model, "gpt-4o-mini");
        assert_eq!(config.agent.max_iterations, 4);
        assert_eq!(config.agent.tool_timeout_secs, Some(5));
        assert_eq!(config.tools.currency.base, "USD");
        assert_eq!(config.tools.currency.rates.len(), 2);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_model = [").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn env_overrides_apply_in_priority_order() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                ("OPENAI_API_KEY", "sk-openai"),
                ("THINKLOOP_API_KEY", "sk-thinkloop"),
                ("THINKLOOP_MODEL", "gpt-4o"),
                ("THINKLOOP_MAX_ITERATIONS", "3"),
                ("THINKLOOP_TEMPERATURE", "0.5"),
            ]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-thinkloop"));
        assert_eq!(config.default_model, "gpt-4o");
        assert_eq!(config.agent.max_iterations, 3);
        assert!((config.default_temperature - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn env_beats_file_values() {
        let mut config = AppConfig {
            api_key: Some("sk-file".into()),
            ..AppConfig::default()
        };
        config.providers.insert(
            "openai".into(),
            ProviderConfig {
                api_key: Some("sk-section".into()),
                api_url: None,
                default_model: Some("gpt-4o-mini".into()),
            },
        );
        config
            .apply_env(env(&[
                ("THINKLOOP_API_KEY", "sk-env"),
                ("THINKLOOP_MODEL", "gpt-4o"),
            ]))
            .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.providers["openai"].api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.agent_config().model, "gpt-4o");
    }

    #[test]
    fn vendor_keys_only_fill_missing_key() {
        let mut config = AppConfig {
            api_key: Some("sk-file".into()),
            ..AppConfig::default()
        };
        config.apply_env(env(&[("OPENAI_API_KEY", "sk-openai")])).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-file"));

        let mut config = AppConfig::default();
        config.apply_env(env(&[("OPENROUTER_API_KEY", "sk-or")])).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-or"));
    }

    #[test]
    fn bad_env_values_rejected() {
        let mut config = AppConfig::default();
        assert!(config.apply_env(env(&[("THINKLOOP_MAX_ITERATIONS", "lots")])).is_err());
        let mut config = AppConfig::default();
        assert!(config.apply_env(env(&[("THINKLOOP_TEMPERATURE", "9")])).is_err());
    }

    #[test]
    fn agent_config_prefers_provider_model() {
        let mut config = AppConfig::default();
        config.providers.insert(
            "openai".into(),
            ProviderConfig {
                api_key: None,
                api_url: None,
                default_model: Some("gpt-4o-mini".into()),
            },
        );
        let agent = config.agent_config();
        assert_eq!(agent.model, "gpt-4o-mini");
        assert_eq!(agent.max_iterations, 10);
        assert_eq!(agent.max_tokens, Some(1024));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gpt-4"));
        assert!(toml_str.contains("max_iterations"));
    }
}
