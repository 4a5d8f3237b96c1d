//! Provider construction from configuration.
//!
//! Every supported backend speaks the OpenAI wire format, so routing reduces
//! to picking a base URL for the configured preset.

use std::sync::Arc;
use dost_config::AppConfig;
use dost_core::provider::Provider;
use crate::openai_compat::OpenAiCompatProvider;

/// Build the configured provider with an already-resolved API key.
pub fn build_from_config(config: &AppConfig, api_key: &str) -> Arc<dyn Provider> {
    let base_url = config
        .api_url
        .clone()
        .unwrap_or_else(|| default_base_url(&config.provider));

    tracing::debug!(provider = %config.provider, base_url = %base_url, "Building provider");
    Arc::new(OpenAiCompatProvider::new(&config.provider, base_url, api_key))
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "groq" => "https://api.groq.com/openai/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
