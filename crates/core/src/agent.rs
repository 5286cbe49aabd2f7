//! Agent configuration value.
//!
//! Built at the edge (CLI, tests) and handed to the agent constructor;
//! nothing in the loop reads process-wide state.

use serde::{Deserialize, Serialize};

/// Configuration for one agent instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Model to request from the provider
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temp")]
    pub temperature: f32,

    /// Maximum tokens per model reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Reason→act→observe cycles allowed per run
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Wall-clock limit for one reasoning call; expiry becomes an observation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_timeout_secs: Option<u64>,
}

fn default_temp() -> f32 {
    0.2
}
fn default_max_iterations() -> u32 {
    10
}

impl AgentConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: default_temp(),
            max_tokens: None,
            max_iterations: default_max_iterations(),
            llm_timeout_secs: None,
        }
    }

    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AgentConfig::new("gpt-4");
        assert_eq!(config.max_iterations, 10);
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert!(config.llm_timeout_secs.is_none());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: AgentConfig = serde_json::from_str(r#"{"model": "m"}"#).unwrap();
        assert_eq!(config.max_iterations, 10);
    }
}
