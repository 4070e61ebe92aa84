use super::types::{
    ChatCompletionChunk, ChatRequest, ChatResponse, JsonSchemaFormat, Message, ResponseFormat,
};
use crate::error::LlmError;
use crate::llm::{
    sanitize_api_error,
    sse::{SseBuffer, parse_data_lines_without_done},
    streaming::{ProviderStream, StreamEvent},
    traits::CompletionRequest,
    types::{ProviderResponse, StopReason},
};
use futures_util::StreamExt;

fn build_messages(request: &CompletionRequest<'_>) -> Vec<Message> {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);

    if let Some(sys) = request.system_prompt {
        messages.push(Message {
            role: "system",
            content: sys.to_string(),
        });
    }

    messages.extend(request.messages.iter().map(|message| Message {
        role: message.role.as_str(),
        content: message.content.clone(),
    }));

    messages
}

pub(in crate::llm) fn build_request(request: &CompletionRequest<'_>, stream: bool) -> ChatRequest {
    ChatRequest {
        model: request.model.to_string(),
        messages: build_messages(request),
        temperature: request.temperature,
        response_format: request.response_schema.map(|schema| ResponseFormat {
            r#type: "json_schema",
            json_schema: JsonSchemaFormat {
                name: schema.name.clone(),
                schema: schema.schema.clone(),
                strict: schema.strict,
            },
        }),
        stream: stream.then_some(true),
    }
}

pub(in crate::llm) fn map_finish_reason(finish_reason: Option<&str>) -> StopReason {
    match finish_reason {
        Some("stop") => StopReason::EndTurn,
        Some("length") => StopReason::MaxTokens,
        Some("content_filter") => StopReason::ContentFilter,
        Some(_) | None => StopReason::Error,
    }
}

pub(in crate::llm) fn build_provider_response(
    chat_response: ChatResponse,
    provider_name: &str,
) -> anyhow::Result<ProviderResponse> {
    let choice = chat_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::EmptyResponse {
            provider: provider_name.to_string(),
        })?;

    let text = choice.message.content.ok_or_else(|| LlmError::EmptyResponse {
        provider: provider_name.to_string(),
    })?;

    let mut provider_response = match chat_response.usage {
        Some(usage) => {
            ProviderResponse::with_usage(text, usage.prompt_tokens, usage.completion_tokens)
        }
        None => ProviderResponse::text_only(text),
    };
    provider_response.stop_reason = Some(map_finish_reason(choice.finish_reason.as_deref()));

    if let Some(api_model) = chat_response.model {
        provider_response = provider_response.with_model(api_model);
    }

    Ok(provider_response)
}

#[derive(Default)]
struct ChunkState {
    sent_start: bool,
    stop_reason: Option<StopReason>,
    input_tokens: Option<u64>,
    output_tokens: Option<u64>,
}

impl ChunkState {
    fn absorb(&mut self, data: &str) -> Result<Vec<StreamEvent>, LlmError> {
        let chunk = serde_json::from_str::<ChatCompletionChunk>(data).map_err(|error| {
            LlmError::Streaming(format!(
                "undecodable stream chunk ({error}): {}",
                sanitize_api_error(data)
            ))
        })?;

        if let Some(error) = &chunk.error {
            return Err(LlmError::Streaming(format!(
                "provider reported an error mid-stream: {}",
                sanitize_api_error(&error.to_string())
            )));
        }

        let mut events = Vec::new();
        if !self.sent_start {
            events.push(StreamEvent::ResponseStart {
                model: chunk.model.clone(),
            });
            self.sent_start = true;
        }

        for choice in chunk.choices {
            if let Some(content) = choice.delta.content
                && !content.is_empty()
            {
                events.push(StreamEvent::TextDelta { text: content });
            }
            if let Some(finish) = choice.finish_reason.as_deref() {
                self.stop_reason = Some(map_finish_reason(Some(finish)));
            }
        }

        if let Some(usage) = chunk.usage {
            self.input_tokens = Some(usage.prompt_tokens);
            self.output_tokens = Some(usage.completion_tokens);
        }

        Ok(events)
    }

    fn done(&self) -> StreamEvent {
        StreamEvent::Done {
            stop_reason: self.stop_reason,
            input_tokens: self.input_tokens,
            output_tokens: self.output_tokens,
        }
    }
}

/// Turn a `text/event-stream` chat-completions body into stream events.
/// `Done` is emitted once, after the body ends, carrying the last finish
/// reason and usage seen. An undecodable chunk, an in-band `error` object or
/// a body with no chunk at all ends the stream with an error instead.
pub(in crate::llm) fn sse_response_to_provider_stream(
    response: reqwest::Response,
    provider_name: String,
) -> ProviderStream {
    let mut byte_stream = response.bytes_stream();

    let stream = async_stream::stream! {
        let mut sse_buffer = SseBuffer::new();
        let mut state = ChunkState::default();
        let mut blocks = Vec::new();
        let mut body_ended = false;

        while !body_ended {
            match byte_stream.next().await {
                Some(Ok(chunk)) => {
                    sse_buffer.push_chunk(&chunk);
                    while let Some(event_block) = sse_buffer.next_event_block() {
                        blocks.push(event_block);
                    }
                }
                Some(Err(error)) => {
                    yield Err(anyhow::Error::from(LlmError::Streaming(format!(
                        "{provider_name} stream interrupted: {error}"
                    ))));
                    return;
                }
                None => {
                    blocks.extend(sse_buffer.take_remainder());
                    body_ended = true;
                }
            }

            for block in blocks.drain(..) {
                for data in parse_data_lines_without_done(&block) {
                    match state.absorb(data) {
                        Ok(events) => {
                            for event in events {
                                yield Ok(event);
                            }
                        }
                        Err(error) => {
                            yield Err(anyhow::Error::from(error));
                            return;
                        }
                    }
                }
            }
        }

        if !state.sent_start {
            yield Err(anyhow::Error::from(LlmError::Streaming(format!(
                "{provider_name} stream ended without any response chunk"
            ))));
            return;
        }

        yield Ok(state.done());
    };

    Box::pin(stream)
}
