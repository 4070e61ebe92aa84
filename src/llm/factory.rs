use super::compatible::OpenAiCompatibleProvider;
use super::traits::Provider;
use crate::config::Config;
use std::sync::Arc;

/// Build the backend provider described by `config`.
///
/// Every configured backend is reached through the OpenAI-compatible
/// chat-completions surface; `config.provider` only labels it.
pub fn create_provider(config: &Config) -> Arc<dyn Provider> {
    if !config.has_api_key() {
        tracing::warn!(
            provider = %config.provider,
            "No API key configured; requests will fail until GUARDCHAT_API_KEY or GEMINI_API_KEY is set"
        );
    }

    Arc::new(OpenAiCompatibleProvider::new(
        &config.provider,
        &config.base_url,
        config.api_key.as_deref(),
        config.timeout_secs,
    ))
}
