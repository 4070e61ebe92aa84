use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for guardchat.
///
/// Library callers match on these to tell a guardrail veto apart from a real
/// failure. Internal code uses `anyhow::Result` for ad-hoc context chains;
/// converting one back recovers the typed variant when the chain carries a
/// `ConfigError`, `LlmError` or `GuardrailError`, and falls back to
/// [`ChatError::Other`].
#[derive(Debug, Error)]
pub enum ChatError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── LLM / Provider ──────────────────────────────────────────────────
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    // ── Guardrails ──────────────────────────────────────────────────────
    #[error("guardrail: {0}")]
    Guardrail(#[from] GuardrailError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<anyhow::Error> for ChatError {
    fn from(error: anyhow::Error) -> Self {
        let error = match error.downcast::<GuardrailError>() {
            Ok(veto) => return Self::Guardrail(veto),
            Err(error) => error,
        };
        let error = match error.downcast::<LlmError>() {
            Ok(llm) => return Self::Llm(llm),
            Err(error) => error,
        };
        match error.downcast::<ConfigError>() {
            Ok(config) => Self::Config(config),
            Err(error) => Self::Other(error),
        }
    }
}

impl ChatError {
    /// The guardrail veto carried by this error, if it is one.
    pub fn as_guardrail(&self) -> Option<&GuardrailError> {
        match self {
            Self::Guardrail(err) => Some(err),
            _ => None,
        }
    }
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{provider} API key not set (export GUARDCHAT_API_KEY or GEMINI_API_KEY)")]
    MissingApiKey { provider: String },

    #[error("provider {provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("provider {provider} API error ({status}): {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("provider {provider} returned no content")]
    EmptyResponse { provider: String },

    #[error("streaming error: {0}")]
    Streaming(String),

    #[error("structured output could not be parsed: {0}")]
    StructuredOutput(String),
}

// ─── Guardrail errors ───────────────────────────────────────────────────────

/// A guardrail veto. These are control-flow interrupts for the chat loop,
/// not failures.
#[derive(Debug, Error)]
pub enum GuardrailError {
    #[error("input guardrail `{guardrail}` tripped")]
    InputBlocked {
        guardrail: String,
        output_info: serde_json::Value,
    },

    #[error("output guardrail `{guardrail}` tripped")]
    OutputBlocked {
        guardrail: String,
        output_info: serde_json::Value,
    },
}

impl GuardrailError {
    pub fn guardrail(&self) -> &str {
        match self {
            Self::InputBlocked { guardrail, .. } | Self::OutputBlocked { guardrail, .. } => {
                guardrail
            }
        }
    }

    pub fn output_info(&self) -> &serde_json::Value {
        match self {
            Self::InputBlocked { output_info, .. } | Self::OutputBlocked { output_info, .. } => {
                output_info
            }
        }
    }
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, ChatError>;
