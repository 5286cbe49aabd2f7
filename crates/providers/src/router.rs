//! Provider selection — builds the configured reasoning service client.
//!
//! This is where a missing credential is caught: hosted providers refuse to
//! build without an API key, so a misconfigured agent fails before any run.

use std::sync::Arc;
use thinkloop_config::AppConfig;
use thinkloop_core::error::ProviderError;
use thinkloop_core::provider::Provider;
use tracing::info;

use crate::openai_compat::OpenAiCompatProvider;

/// Build the default provider described by `config`.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let name = config.default_provider.as_str();
    let provider_config = config.providers.get(name);

    let base_url = provider_config
        .and_then(|p| p.api_url.clone())
        .or_else(|| default_base_url(name))
        .ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "unknown provider '{name}': set providers.{name}.api_url"
            ))
        })?;

    let api_key = provider_config
        .and_then(|p| p.api_key.clone())
        .or_else(|| config.api_key.clone());

    let api_key = match api_key {
        Some(key) if !key.trim().is_empty() => key,
        _ if is_local(name) => name.to_string(),
        _ => {
            return Err(ProviderError::NotConfigured(format!(
                "no API key for provider '{name}' (set THINKLOOP_API_KEY or OPENAI_API_KEY)"
            )));
        }
    };

    info!(provider = %name, base_url = %base_url, "Reasoning provider configured");
    Ok(Arc::new(OpenAiCompatProvider::new(name, base_url, api_key)))
}

/// Providers served from the local machine need no credential.
fn is_local(provider_name: &str) -> bool {
    matches!(provider_name, "ollama" | "vllm" | "llamacpp" | "llama.cpp")
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> Option<String> {
    let url = match provider_name {
        "openai" => "https://api.openai.com/v1",
        "openrouter" => "https://openrouter.ai/api/v1",
        "ollama" => "http://localhost:11434/v1",
        "deepseek" => "https://api.deepseek.com/v1",
        "groq" => "https://api.groq.com/openai/v1",
        "together" => "https://api.together.xyz/v1",
        "vllm" => "http://localhost:8000/v1",
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1",
        _ => return None,
    };
    Some(url.into())
}
