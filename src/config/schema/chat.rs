use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// What happens to the user turn whose input a guardrail rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectedTurnPolicy {
    /// Leave the user turn in history with no assistant reply after it.
    #[default]
    Keep,
    /// Remove the user turn once the rejection has been reported.
    Drop,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Typed as a whole line (any case) to leave the loop.
    #[serde(default = "default_exit_token")]
    pub exit_token: String,
    #[serde(default)]
    pub rejected_turns: RejectedTurnPolicy,
}

fn default_exit_token() -> String {
    "exit".into()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            exit_token: default_exit_token(),
            rejected_turns: RejectedTurnPolicy::default(),
        }
    }
}

impl ChatConfig {
    /// Strip stray whitespace around the exit token so it can match a typed
    /// line.
    pub fn normalize(&mut self) {
        let trimmed = self.exit_token.trim();
        if trimmed.len() != self.exit_token.len() {
            self.exit_token = trimmed.to_string();
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.exit_token.trim().is_empty() {
            return Err(ConfigError::Validation(
                "chat.exit_token must not be empty".into(),
            ));
        }
        Ok(())
    }
}
