use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// The response-generating agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_assistant_name")]
    pub name: String,
    #[serde(default = "default_assistant_instructions")]
    pub instructions: String,
}

fn default_assistant_name() -> String {
    "Customer support Assistant".into()
}

fn default_assistant_instructions() -> String {
    "You are a customer support agent. You help customers with their questions.".into()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_assistant_name(),
            instructions: default_assistant_instructions(),
        }
    }
}

impl AssistantConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        validate_agent("assistant", &self.name, &self.instructions)
    }
}

/// The input classifier and optional output keyword check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_guardrail_name")]
    pub name: String,
    /// Describes the domain the classifier trips on.
    #[serde(default = "default_guardrail_instructions")]
    pub instructions: String,
    /// Terms that veto an assistant reply (case-insensitive). Empty disables
    /// the output check.
    #[serde(default)]
    pub output_blocked_terms: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_guardrail_name() -> String {
    "Guardrail check".into()
}

fn default_guardrail_instructions() -> String {
    "Check if the user is asking you about AgenticAI.".into()
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: default_guardrail_name(),
            instructions: default_guardrail_instructions(),
            output_blocked_terms: Vec::new(),
        }
    }
}

impl GuardrailConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.output_blocked_terms.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "guardrail.output_blocked_terms must not contain blank terms".into(),
            ));
        }
        if !self.enabled {
            return Ok(());
        }
        validate_agent("guardrail", &self.name, &self.instructions)
    }
}

fn validate_agent(label: &str, name: &str, instructions: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{label}.name must not be empty")));
    }
    if instructions.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{label}.instructions must not be empty"
        )));
    }
    Ok(())
}
