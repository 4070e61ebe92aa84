use super::streaming::{ProviderStream, resp_to_events};
use super::types::{ProviderMessage, ProviderResponse, ResponseSchema};
use futures_util::stream;
use std::future::Future;
use std::pin::Pin;

/// Everything a provider needs for one chat-completions call.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system_prompt: Option<&'a str>,
    pub messages: &'a [ProviderMessage],
    pub model: &'a str,
    pub temperature: Option<f64>,
    /// Ask for JSON shaped by this schema instead of free text.
    pub response_schema: Option<&'a ResponseSchema>,
}

impl<'a> CompletionRequest<'a> {
    pub fn new(model: &'a str, messages: &'a [ProviderMessage]) -> Self {
        Self {
            system_prompt: None,
            messages,
            model,
            temperature: None,
            response_schema: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: &'a str) -> Self {
        self.system_prompt = Some(system_prompt);
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_response_schema(mut self, schema: &'a ResponseSchema) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Provider capabilities reported at runtime.
#[derive(Debug, Clone, Default)]
pub struct ProviderCapabilities {
    pub streaming: bool,
    pub structured_output: bool,
}

pub trait Provider: Send + Sync {
    /// Provider identifier (e.g. "gemini").
    fn name(&self) -> &str;

    /// Runtime capability flags.
    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::default()
    }

    /// One-shot completion.
    fn complete<'a>(
        &'a self,
        request: CompletionRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>>;

    /// Streamed completion. Providers without native streaming replay the
    /// one-shot response as a short event sequence.
    fn complete_stream<'a>(
        &'a self,
        request: CompletionRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderStream>> + Send + 'a>> {
        Box::pin(async move {
            let resp = self.complete(request).await?;
            Ok(Box::pin(stream::iter(resp_to_events(resp))) as ProviderStream)
        })
    }

    fn supports_streaming(&self) -> bool {
        self.capabilities().streaming
    }
}
