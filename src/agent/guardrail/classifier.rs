use super::{GuardrailOutput, InputGuardrail};
use crate::config::GuardrailConfig;
use crate::llm::{CompletionRequest, Provider, ProviderMessage, ResponseSchema, parse_structured};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Classifier verdict: does the pending input concern the watched domain?
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainVerdict {
    pub matches_domain: bool,
    pub reasoning: String,
}

impl DomainVerdict {
    pub fn response_schema() -> ResponseSchema {
        ResponseSchema {
            name: "domain_verdict".to_string(),
            schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "matches_domain": {"type": "boolean"},
                    "reasoning": {"type": "string"}
                },
                "required": ["matches_domain", "reasoning"],
                "additionalProperties": false
            }),
            strict: true,
        }
    }
}

/// Input guardrail backed by a second model call that returns a
/// [`DomainVerdict`]. A verdict with `matches_domain == true` trips.
pub struct ModelGuardrail {
    provider: Arc<dyn Provider>,
    name: String,
    instructions: String,
    model: String,
    temperature: Option<f64>,
    schema: ResponseSchema,
}

impl ModelGuardrail {
    pub fn new(
        provider: Arc<dyn Provider>,
        name: impl Into<String>,
        instructions: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            name: name.into(),
            instructions: instructions.into(),
            model: model.into(),
            temperature: None,
            schema: DomainVerdict::response_schema(),
        }
    }

    pub fn from_config(
        provider: Arc<dyn Provider>,
        config: &GuardrailConfig,
        model: &str,
        temperature: Option<f64>,
    ) -> Self {
        Self::new(provider, &config.name, &config.instructions, model)
            .with_temperature(temperature)
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    /// System prompt for the classifier call. Providers that cannot enforce
    /// a response schema get it spelled out in the prompt instead.
    fn system_prompt(&self) -> Cow<'_, str> {
        if self.provider.capabilities().structured_output {
            return Cow::Borrowed(&self.instructions);
        }
        tracing::debug!(
            guardrail = %self.name,
            provider = self.provider.name(),
            "Provider lacks structured output, describing the schema in the prompt"
        );
        Cow::Owned(format!(
            "{}\n\nReply with a single JSON object matching this schema and nothing else:\n{}",
            self.instructions, self.schema.schema
        ))
    }

    /// Ask the model for a verdict on `turns`. A reply that is not a valid
    /// verdict is an error, never a pass.
    pub async fn classify(&self, turns: &[ProviderMessage]) -> anyhow::Result<DomainVerdict> {
        let system_prompt = self.system_prompt();
        let request = CompletionRequest::new(&self.model, turns)
            .with_system_prompt(&system_prompt)
            .with_temperature(self.temperature)
            .with_response_schema(&self.schema);

        let response = self.provider.complete(request).await?;
        let verdict: DomainVerdict = parse_structured(&response.text, &self.schema)?;

        tracing::debug!(
            guardrail = %self.name,
            matches_domain = verdict.matches_domain,
            reasoning = %verdict.reasoning,
            "Guardrail verdict"
        );
        Ok(verdict)
    }
}

impl InputGuardrail for ModelGuardrail {
    fn name(&self) -> &str {
        &self.name
    }

    fn check<'a>(
        &'a self,
        turns: &'a [ProviderMessage],
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<GuardrailOutput>> + Send + 'a>> {
        Box::pin(async move {
            let verdict = self.classify(turns).await?;
            let output_info = serde_json::to_value(&verdict)?;
            Ok(if verdict.matches_domain {
                GuardrailOutput::trip(&self.name, output_info)
            } else {
                GuardrailOutput::pass(&self.name, output_info)
            })
        })
    }
}
