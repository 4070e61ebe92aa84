use super::types::{ProviderResponse, StopReason};
use anyhow::Result;
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

pub type ProviderStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send + 'static>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StreamEvent {
    ResponseStart {
        model: Option<String>,
    },
    /// Incremental piece of generated text. Meaningless out of order.
    TextDelta {
        text: String,
    },
    /// Authoritative full reply text, when the provider knows it. Replaces
    /// whatever the deltas added up to.
    MessageComplete {
        text: String,
    },
    Done {
        stop_reason: Option<StopReason>,
        input_tokens: Option<u64>,
        output_tokens: Option<u64>,
    },
}

/// Folds stream events into the final [`ProviderResponse`].
#[derive(Debug, Default)]
pub struct StreamCollector {
    text: String,
    completed_text: Option<String>,
    stop_reason: Option<StopReason>,
    input_tokens: Option<u64>,
    output_tokens: Option<u64>,
    model: Option<String>,
    deltas: usize,
}

impl StreamCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, event: &StreamEvent) {
        match event {
            StreamEvent::ResponseStart { model } => {
                self.model.clone_from(model);
            }
            StreamEvent::TextDelta { text } => {
                self.text.push_str(text);
                self.deltas += 1;
            }
            StreamEvent::MessageComplete { text } => {
                self.completed_text = Some(text.clone());
            }
            StreamEvent::Done {
                stop_reason,
                input_tokens,
                output_tokens,
            } => {
                self.stop_reason = *stop_reason;
                self.input_tokens = *input_tokens;
                self.output_tokens = *output_tokens;
            }
        }
    }

    /// Number of text deltas seen so far.
    pub fn delta_count(&self) -> usize {
        self.deltas
    }

    pub fn finish(self) -> ProviderResponse {
        if let Some(completed) = &self.completed_text
            && *completed != self.text
        {
            tracing::debug!(
                streamed_len = self.text.len(),
                final_len = completed.len(),
                "Streamed deltas differ from final message; using final message"
            );
        }

        ProviderResponse {
            text: self.completed_text.unwrap_or(self.text),
            input_tokens: self.input_tokens,
            output_tokens: self.output_tokens,
            model: self.model,
            stop_reason: self.stop_reason,
        }
    }
}

/// Replay a one-shot response as stream events.
pub fn resp_to_events(resp: ProviderResponse) -> Vec<Result<StreamEvent>> {
    let ProviderResponse {
        text,
        input_tokens,
        output_tokens,
        model,
        stop_reason,
    } = resp;

    let mut events = vec![Ok(StreamEvent::ResponseStart { model })];
    if !text.is_empty() {
        events.push(Ok(StreamEvent::TextDelta { text: text.clone() }));
    }
    events.push(Ok(StreamEvent::MessageComplete { text }));
    events.push(Ok(StreamEvent::Done {
        stop_reason,
        input_tokens,
        output_tokens,
    }));
    events
}
