//! LLM Provider implementations for agentloops.
//!
//! All providers implement the `agentloops_core::Provider` trait.
//! [`build_from_config`] turns an [`AppConfig`] into a ready provider.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use agentloops_config::AppConfig;
use agentloops_core::Provider;
use agentloops_core::error::ProviderError;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Build the configured provider.
///
/// Fails with [`ProviderError::NotConfigured`] when no API key is set,
/// unless the endpoint is a local one that ignores keys.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let is_local = config.base_url.contains("localhost") || config.base_url.contains("127.0.0.1");
    let api_key = match (&config.api_key, is_local) {
        (Some(key), _) => key.clone(),
        (None, true) => "local".to_string(),
        (None, false) => {
            return Err(ProviderError::NotConfigured(
                "no API key (set OPENAI_API_KEY or api_key in config.toml)".into(),
            ));
        }
    };

    let provider = OpenAiCompatProvider::new(
        "openai-compatible",
        &config.base_url,
        api_key,
        Duration::from_secs(config.timeout_secs),
    )?;
    debug!(base_url = %provider.base_url(), model = %config.model, "Provider ready");
    Ok(Arc::new(provider))
}
