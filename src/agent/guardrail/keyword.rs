use super::{GuardrailOutput, InputGuardrail, OutputGuardrail};
use crate::llm::{MessageRole, ProviderMessage};
use std::future::Future;
use std::pin::Pin;

/// Trips when the checked text contains any configured term, ignoring case.
///
/// As an input guardrail only the latest user turn is inspected.
#[derive(Debug, Clone)]
pub struct KeywordGuardrail {
    name: String,
    terms: Vec<String>,
}

impl KeywordGuardrail {
    pub fn new(name: impl Into<String>, terms: &[String]) -> Self {
        Self {
            name: name.into(),
            terms: terms
                .iter()
                .map(|term| term.trim().to_lowercase())
                .filter(|term| !term.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    fn evaluate(&self, text: &str) -> GuardrailOutput {
        let haystack = text.to_lowercase();
        let hits: Vec<&str> = self
            .terms
            .iter()
            .filter(|term| haystack.contains(term.as_str()))
            .map(String::as_str)
            .collect();

        let output_info = serde_json::json!({ "matched_terms": hits });
        if hits.is_empty() {
            GuardrailOutput::pass(&self.name, output_info)
        } else {
            GuardrailOutput::trip(&self.name, output_info)
        }
    }
}

impl InputGuardrail for KeywordGuardrail {
    fn name(&self) -> &str {
        &self.name
    }

    fn check<'a>(
        &'a self,
        turns: &'a [ProviderMessage],
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<GuardrailOutput>> + Send + 'a>> {
        let latest = turns
            .iter()
            .rev()
            .find(|turn| turn.role == MessageRole::User)
            .map_or("", |turn| turn.content.as_str());
        let output = self.evaluate(latest);
        Box::pin(async move { Ok(output) })
    }
}

impl OutputGuardrail for KeywordGuardrail {
    fn name(&self) -> &str {
        &self.name
    }

    fn check<'a>(
        &'a self,
        reply: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<GuardrailOutput>> + Send + 'a>> {
        let output = self.evaluate(reply);
        Box::pin(async move { Ok(output) })
    }
}
