use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub(in crate::llm) struct ChatRequest {
    pub(in crate::llm) model: String,
    pub(in crate::llm) messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(in crate::llm) temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(in crate::llm) response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(in crate::llm) stream: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(in crate::llm) struct Message {
    pub(in crate::llm) role: &'static str,
    pub(in crate::llm) content: String,
}

#[derive(Debug, Serialize)]
pub(in crate::llm) struct ResponseFormat {
    pub(in crate::llm) r#type: &'static str,
    pub(in crate::llm) json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
pub(in crate::llm) struct JsonSchemaFormat {
    pub(in crate::llm) name: String,
    pub(in crate::llm) schema: Value,
    pub(in crate::llm) strict: bool,
}

#[derive(Debug, Deserialize)]
pub(in crate::llm) struct ChatResponse {
    pub(in crate::llm) choices: Vec<Choice>,
    pub(in crate::llm) usage: Option<Usage>,
    pub(in crate::llm) model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(in crate::llm) struct Usage {
    pub(in crate::llm) prompt_tokens: u64,
    pub(in crate::llm) completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
pub(in crate::llm) struct Choice {
    pub(in crate::llm) message: ResponseMessage,
    pub(in crate::llm) finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(in crate::llm) struct ResponseMessage {
    pub(in crate::llm) content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(in crate::llm) struct ChatCompletionChunk {
    pub(in crate::llm) model: Option<String>,
    #[serde(default)]
    pub(in crate::llm) choices: Vec<ChunkChoice>,
    pub(in crate::llm) usage: Option<Usage>,
    /// In-band failure reported after the 200 status was already sent.
    pub(in crate::llm) error: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(in crate::llm) struct ChunkChoice {
    pub(in crate::llm) delta: ChunkDelta,
    pub(in crate::llm) finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(in crate::llm) struct ChunkDelta {
    pub(in crate::llm) content: Option<String>,
}
