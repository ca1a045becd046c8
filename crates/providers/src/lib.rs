//! Language-model provider implementations for PersonaChat.
//!
//! All providers implement the `personachat_core::Provider` trait.
//! [`build_from_config`] wires the configured endpoint into a shared handle.

pub mod openai_compat;

use std::sync::Arc;

use personachat_config::AppConfig;
use personachat_core::error::ProviderError;
use personachat_core::provider::Provider;
use tracing::warn;

pub use openai_compat::OpenAiCompatProvider;

/// Build the provider described by the configuration.
///
/// A missing API key is not fatal here: the server still starts and every
/// model call fails with an authentication error, which the conversation
/// engine turns into its apology text.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = match &config.api_key {
        Some(key) => key.clone(),
        None => {
            warn!("No API key configured (set OPENAI_API_KEY); model calls will fail");
            String::new()
        }
    };

    let provider = OpenAiCompatProvider::new(
        "openai",
        &config.api_url,
        api_key,
        std::time::Duration::from_secs(config.request_timeout_secs),
    )?;

    Ok(Arc::new(provider))
}
