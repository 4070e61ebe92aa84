//! Checks that may veto a request before generation or a reply after it.

pub mod classifier;
pub mod keyword;

pub use classifier::{DomainVerdict, ModelGuardrail};
pub use keyword::KeywordGuardrail;

use crate::llm::ProviderMessage;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

/// Result of running one guardrail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuardrailOutput {
    pub guardrail: String,
    /// Guardrail-specific detail, e.g. the classifier verdict.
    pub output_info: Value,
    /// `true` means the guardrail vetoes the turn.
    pub tripwire_triggered: bool,
}

impl GuardrailOutput {
    pub fn pass(guardrail: impl Into<String>, output_info: Value) -> Self {
        Self {
            guardrail: guardrail.into(),
            output_info,
            tripwire_triggered: false,
        }
    }

    pub fn trip(guardrail: impl Into<String>, output_info: Value) -> Self {
        Self {
            guardrail: guardrail.into(),
            output_info,
            tripwire_triggered: true,
        }
    }
}

/// Runs over the pending turns before the agent generates anything.
pub trait InputGuardrail: Send + Sync {
    fn name(&self) -> &str;

    fn check<'a>(
        &'a self,
        turns: &'a [ProviderMessage],
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<GuardrailOutput>> + Send + 'a>>;
}

/// Runs over the assembled reply once streaming has finished.
pub trait OutputGuardrail: Send + Sync {
    fn name(&self) -> &str;

    fn check<'a>(
        &'a self,
        reply: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<GuardrailOutput>> + Send + 'a>>;
}
