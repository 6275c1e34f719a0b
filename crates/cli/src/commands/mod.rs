//! Subcommand implementations.

pub mod config_cmd;
pub mod plan;
pub mod react;
pub mod reflect;
pub mod tools;

use agentloops_agent::LlmClient;
use agentloops_config::{AppConfig, ConfigError};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Load configuration, apply command-line overrides, and build the LLM
/// client it describes.
pub(crate) fn load_llm(
    overrides: impl FnOnce(&mut AppConfig),
) -> Result<(AppConfig, LlmClient), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let config = with_overrides(config, overrides)?;

    let provider = agentloops_providers::build_from_config(&config).map_err(|e| {
        format!(
            "{e}\n  Set OPENAI_API_KEY (or AGENTLOOPS_API_KEY), or add api_key to {}",
            AppConfig::config_dir().join("config.toml").display()
        )
    })?;

    let llm = LlmClient::new(provider, &config.model)
        .with_stream(config.stream)
        .with_max_tokens(config.max_tokens);
    Ok((config, llm))
}

/// Flags go through the same validation as the config file.
fn with_overrides(
    mut config: AppConfig,
    overrides: impl FnOnce(&mut AppConfig),
) -> Result<AppConfig, ConfigError> {
    overrides(&mut config);
    config.validate()?;
    Ok(config)
}

/// A token that fires on Ctrl-C.
pub(crate) fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling run");
            trigger.cancel();
        }
    });
    cancel
}
