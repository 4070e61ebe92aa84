use super::guardrail::{InputGuardrail, OutputGuardrail};
use crate::config::Config;
use crate::error::{GuardrailError, LlmError, Result};
use crate::llm::{
    CompletionRequest, Provider, ProviderMessage, ProviderStream, StreamCollector, StreamEvent,
};
use futures_util::StreamExt;
use std::sync::Arc;

/// A response-generating agent: instructions, a model, and the guardrails
/// that gate it. Immutable once built.
pub struct Agent {
    name: String,
    instructions: String,
    model: String,
    temperature: Option<f64>,
    provider: Arc<dyn Provider>,
    input_guardrails: Vec<Arc<dyn InputGuardrail>>,
    output_guardrails: Vec<Arc<dyn OutputGuardrail>>,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        model: impl Into<String>,
        provider: Arc<dyn Provider>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            model: model.into(),
            temperature: None,
            provider,
            input_guardrails: Vec::new(),
            output_guardrails: Vec::new(),
        }
    }

    /// The assistant described by `[assistant]`, without guardrails.
    pub fn from_config(config: &Config, provider: Arc<dyn Provider>) -> Self {
        Self::new(
            &config.assistant.name,
            &config.assistant.instructions,
            &config.model,
            provider,
        )
        .with_temperature(config.temperature)
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn with_input_guardrail(mut self, guardrail: Arc<dyn InputGuardrail>) -> Self {
        self.input_guardrails.push(guardrail);
        self
    }

    #[must_use]
    pub fn with_output_guardrail(mut self, guardrail: Arc<dyn OutputGuardrail>) -> Self {
        self.output_guardrails.push(guardrail);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn input_guardrail_count(&self) -> usize {
        self.input_guardrails.len()
    }

    pub fn output_guardrail_count(&self) -> usize {
        self.output_guardrails.len()
    }

    /// Run every input guardrail in order. The first trip wins.
    pub async fn check_input(&self, turns: &[ProviderMessage]) -> Result<()> {
        for guardrail in &self.input_guardrails {
            let output = guardrail.check(turns).await?;
            if output.tripwire_triggered {
                tracing::info!(
                    agent = %self.name,
                    guardrail = %output.guardrail,
                    "Input guardrail tripped"
                );
                return Err(GuardrailError::InputBlocked {
                    guardrail: output.guardrail,
                    output_info: output.output_info,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Gate `turns` through the input guardrails, then start a streamed
    /// generation. Nothing is sent to the model if a guardrail trips.
    pub async fn run_streamed(&self, turns: &[ProviderMessage]) -> Result<StreamedRun<'_>> {
        self.check_input(turns).await?;

        tracing::debug!(
            agent = %self.name,
            model = %self.model,
            turns = turns.len(),
            "Starting streamed run"
        );

        let request = CompletionRequest::new(&self.model, turns)
            .with_system_prompt(&self.instructions)
            .with_temperature(self.temperature);
        let stream = self.provider.complete_stream(request).await?;

        Ok(StreamedRun {
            agent: &self.name,
            stream,
            collector: StreamCollector::new(),
            output_guardrails: &self.output_guardrails,
            exhausted: false,
            failed: false,
        })
    }
}

/// One in-flight generation.
///
/// Pull fragments with [`next_fragment`](Self::next_fragment) to echo them
/// as they arrive, then call [`finish`](Self::finish) for the final text.
/// The final text is what counts; it may differ from the fragments.
pub struct StreamedRun<'a> {
    agent: &'a str,
    stream: ProviderStream,
    collector: StreamCollector,
    output_guardrails: &'a [Arc<dyn OutputGuardrail>],
    exhausted: bool,
    failed: bool,
}

impl StreamedRun<'_> {
    /// Next text fragment, or `None` once the model has finished.
    pub async fn next_fragment(&mut self) -> Option<Result<String>> {
        if self.exhausted {
            return None;
        }

        loop {
            match self.stream.next().await {
                None => {
                    self.exhausted = true;
                    return None;
                }
                Some(Err(error)) => {
                    self.exhausted = true;
                    self.failed = true;
                    return Some(Err(error.into()));
                }
                Some(Ok(event)) => {
                    self.collector.feed(&event);
                    if let StreamEvent::TextDelta { text } = event {
                        return Some(Ok(text));
                    }
                }
            }
        }
    }

    /// Drain what is left, run the output guardrails and return the final
    /// assembled text.
    pub async fn finish(mut self) -> Result<String> {
        while let Some(fragment) = self.next_fragment().await {
            fragment?;
        }
        if self.failed {
            return Err(LlmError::Streaming(format!(
                "stream for agent `{}` ended with an error",
                self.agent
            ))
            .into());
        }

        let fragments = self.collector.delta_count();
        let response = self.collector.finish();
        tracing::debug!(
            agent = %self.agent,
            fragments,
            input_tokens = ?response.input_tokens,
            output_tokens = ?response.output_tokens,
            total_tokens = ?response.total_tokens(),
            "Stream finished"
        );

        for guardrail in self.output_guardrails {
            let output = guardrail.check(&response.text).await?;
            if output.tripwire_triggered {
                tracing::info!(
                    agent = %self.agent,
                    guardrail = %output.guardrail,
                    "Output guardrail tripped"
                );
                return Err(GuardrailError::OutputBlocked {
                    guardrail: output.guardrail,
                    output_info: output.output_info,
                }
                .into());
            }
        }

        Ok(response.text)
    }
}
