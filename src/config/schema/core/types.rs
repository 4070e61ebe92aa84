use super::super::{AssistantConfig, ChatConfig, GuardrailConfig};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_PROVIDER: &str = "gemini";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path the config was loaded from (or would be saved to) - not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Label used in logs and error messages for the backend.
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature; omitted from requests when unset so the
    /// backend default applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub guardrail: GuardrailConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

fn default_provider() -> String {
    DEFAULT_PROVIDER.into()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_model() -> String {
    DEFAULT_MODEL.into()
}

fn default_timeout_secs() -> u64 {
    crate::llm::http_client::DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            api_key: None,
            provider: default_provider(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: None,
            timeout_secs: default_timeout_secs(),
            assistant: AssistantConfig::default(),
            guardrail: GuardrailConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.base_url).map_err(|error| {
            ConfigError::Validation(format!("base_url `{}` is not a URL: {error}", self.base_url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "base_url must use http or https, got `{}`",
                parsed.scheme()
            )));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::Validation("model must not be empty".into()));
        }

        if let Some(temperature) = self.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(ConfigError::Validation(format!(
                "temperature {temperature} outside 0.0..=2.0"
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "timeout_secs must be greater than zero".into(),
            ));
        }

        self.assistant.validate()?;
        self.guardrail.validate()?;
        self.chat.validate()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}
