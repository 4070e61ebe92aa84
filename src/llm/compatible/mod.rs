//! Provider for any backend that speaks the OpenAI chat-completions API.
//! Gemini, Groq, Together, vLLM and llama.cpp servers all accept the same
//! `/chat/completions` request shape, so one implementation covers them.

mod compat;
mod types;

use crate::error::LlmError;
use crate::llm::{
    build_provider_client_with_timeout,
    streaming::ProviderStream,
    traits::{CompletionRequest, Provider, ProviderCapabilities},
    types::ProviderResponse,
};
use compat::{build_provider_response, build_request, sse_response_to_provider_stream};
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use types::{ChatRequest, ChatResponse};

pub struct OpenAiCompatibleProvider {
    name: String,
    /// Pre-computed `Bearer <key>` header value.
    cached_auth_header: Option<String>,
    /// Pre-computed chat completions URL.
    cached_chat_url: String,
    client: Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(name: &str, base_url: &str, api_key: Option<&str>, timeout_secs: u64) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let cached_chat_url = if base_url.ends_with("chat/completions") {
            base_url.to_string()
        } else {
            format!("{base_url}/chat/completions")
        };

        let cached_auth_header = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| format!("Bearer {key}"));

        Self {
            name: name.to_string(),
            cached_auth_header,
            cached_chat_url,
            client: build_provider_client_with_timeout(timeout_secs),
        }
    }

    pub fn chat_completions_url(&self) -> &str {
        &self.cached_chat_url
    }

    async fn send(&self, request: &ChatRequest) -> anyhow::Result<reqwest::Response> {
        let auth_header = self
            .cached_auth_header
            .as_deref()
            .ok_or_else(|| LlmError::MissingApiKey {
                provider: self.name.clone(),
            })?;

        tracing::debug!(
            provider = %self.name,
            model = %request.model,
            messages = request.messages.len(),
            stream = request.stream.unwrap_or(false),
            structured = request.response_format.is_some(),
            "Sending chat completions request"
        );

        let response = self
            .client
            .post(&self.cached_chat_url)
            .header("Authorization", auth_header)
            .json(request)
            .send()
            .await
            .map_err(|error| LlmError::Request {
                provider: self.name.clone(),
                message: crate::llm::sanitize_api_error(&error.to_string()),
            })?;

        if !response.status().is_success() {
            return Err(crate::llm::api_error(&self.name, response).await);
        }

        Ok(response)
    }
}

impl Provider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            streaming: true,
            structured_output: true,
        }
    }

    fn complete<'a>(
        &'a self,
        request: CompletionRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>> {
        Box::pin(async move {
            let chat_request = build_request(&request, false);
            let response = self.send(&chat_request).await?;
            let chat_response: ChatResponse =
                response.json().await.map_err(|error| LlmError::Request {
                    provider: self.name.clone(),
                    message: format!("response JSON decode failed: {error}"),
                })?;
            build_provider_response(chat_response, &self.name)
        })
    }

    fn complete_stream<'a>(
        &'a self,
        request: CompletionRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderStream>> + Send + 'a>> {
        Box::pin(async move {
            let chat_request = build_request(&request, true);
            let response = self.send(&chat_request).await?;
            Ok(sse_response_to_provider_stream(response, self.name.clone()))
        })
    }
}
