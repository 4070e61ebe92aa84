//! Test doubles shared by the agent and chat loop tests.

use super::guardrail::{GuardrailOutput, InputGuardrail};
use crate::llm::{
    CompletionRequest, Provider, ProviderCapabilities, ProviderMessage, ProviderResponse,
    ProviderStream, StopReason, StreamEvent,
};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

enum Script {
    Reply {
        fragments: Vec<String>,
        final_text: Option<String>,
    },
    BrokenStream {
        fragments: Vec<String>,
        error: String,
    },
    Fail(String),
}

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub system_prompt: Option<String>,
    pub messages: Vec<ProviderMessage>,
    pub temperature: Option<f64>,
}

/// Provider that plays back queued replies in order.
pub struct ScriptedProvider {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<SeenRequest>>,
    stream_calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            stream_calls: AtomicUsize::new(0),
        })
    }

    fn push(self: Arc<Self>, script: Script) -> Arc<Self> {
        self.scripts.lock().unwrap_or_else(PoisonError::into_inner).push_back(script);
        self
    }

    /// Queue a reply streamed as `fragments`, optionally followed by an
    /// authoritative final message.
    pub fn reply_with(self: Arc<Self>, fragments: &[&str], final_text: Option<&str>) -> Arc<Self> {
        self.push(Script::Reply {
            fragments: fragments.iter().map(|s| (*s).to_string()).collect(),
            final_text: final_text.map(str::to_string),
        })
    }

    /// Queue a stream that breaks after `fragments`.
    pub fn reply_with_error(self: Arc<Self>, fragments: &[&str], error: &str) -> Arc<Self> {
        self.push(Script::BrokenStream {
            fragments: fragments.iter().map(|s| (*s).to_string()).collect(),
            error: error.to_string(),
        })
    }

    /// Queue a request that fails before any stream exists.
    pub fn fail_with(self: Arc<Self>, error: &str) -> Arc<Self> {
        self.push(Script::Fail(error.to_string()))
    }

    pub fn stream_calls(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SeenRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    fn record(&self, request: &CompletionRequest<'_>) -> Option<Script> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(SeenRequest {
            system_prompt: request.system_prompt.map(str::to_string),
            messages: request.messages.to_vec(),
            temperature: request.temperature,
        });
        self.scripts.lock().unwrap_or_else(PoisonError::into_inner).pop_front()
    }
}

impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            streaming: true,
            structured_output: false,
        }
    }

    fn complete<'a>(
        &'a self,
        request: CompletionRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>> {
        let script = self.record(&request);
        Box::pin(async move {
            match script {
                Some(Script::Reply {
                    fragments,
                    final_text,
                }) => Ok(ProviderResponse::text_only(
                    final_text.unwrap_or_else(|| fragments.concat()),
                )),
                Some(Script::BrokenStream { error, .. } | Script::Fail(error)) => {
                    Err(anyhow::anyhow!(error))
                }
                None => Err(anyhow::anyhow!("no scripted reply left")),
            }
        })
    }

    fn complete_stream<'a>(
        &'a self,
        request: CompletionRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderStream>> + Send + 'a>> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.record(&request);
        Box::pin(async move {
            let mut events: Vec<anyhow::Result<StreamEvent>> =
                vec![Ok(StreamEvent::ResponseStart { model: None })];
            match script {
                Some(Script::Reply {
                    fragments,
                    final_text,
                }) => {
                    events.extend(
                        fragments
                            .into_iter()
                            .map(|text| Ok(StreamEvent::TextDelta { text })),
                    );
                    if let Some(text) = final_text {
                        events.push(Ok(StreamEvent::MessageComplete { text }));
                    }
                    events.push(Ok(StreamEvent::Done {
                        stop_reason: Some(StopReason::EndTurn),
                        input_tokens: None,
                        output_tokens: None,
                    }));
                }
                Some(Script::BrokenStream { fragments, error }) => {
                    events.extend(
                        fragments
                            .into_iter()
                            .map(|text| Ok(StreamEvent::TextDelta { text })),
                    );
                    events.push(Err(anyhow::anyhow!(error)));
                }
                Some(Script::Fail(error)) => return Err(anyhow::anyhow!(error)),
                None => return Err(anyhow::anyhow!("no scripted reply left")),
            }
            Ok(Box::pin(futures_util::stream::iter(events)) as ProviderStream)
        })
    }
}

/// Input guardrail with a fixed outcome.
pub struct StaticGuardrail {
    name: String,
    trip: bool,
}

impl StaticGuardrail {
    pub fn passing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            trip: false,
        }
    }

    pub fn tripping(name: &str) -> Self {
        Self {
            name: name.to_string(),
            trip: true,
        }
    }
}

impl InputGuardrail for StaticGuardrail {
    fn name(&self) -> &str {
        &self.name
    }

    fn check<'a>(
        &'a self,
        _turns: &'a [ProviderMessage],
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<GuardrailOutput>> + Send + 'a>> {
        let info = serde_json::json!({ "static": true });
        let output = if self.trip {
            GuardrailOutput::trip(&self.name, info)
        } else {
            GuardrailOutput::pass(&self.name, info)
        };
        Box::pin(async move { Ok(output) })
    }
}
