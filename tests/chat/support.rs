use guardchat::Config;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

pub const DOMAIN: &str = "agenticai";

/// Config pointed at the mock server with a dummy key.
pub fn config_for(server: &MockServer) -> Config {
    Config {
        api_key: Some("test-key".into()),
        base_url: server.uri(),
        ..Config::default()
    }
}

fn body(request: &Request) -> Option<Value> {
    serde_json::from_slice(&request.body).ok()
}

fn last_user_text(body: &Value) -> Option<String> {
    body["messages"]
        .as_array()?
        .iter()
        .rev()
        .find(|m| m["role"] == "user")
        .and_then(|m| m["content"].as_str())
        .map(str::to_string)
}

/// Matches classifier requests whose latest user turn does (or does not)
/// mention the watched domain.
pub struct ClassifierRequest {
    pub on_topic: bool,
}

impl Match for ClassifierRequest {
    fn matches(&self, request: &Request) -> bool {
        let Some(body) = body(request) else {
            return false;
        };
        if body["response_format"]["type"] != "json_schema" {
            return false;
        }
        last_user_text(&body)
            .is_some_and(|text| text.to_lowercase().contains(DOMAIN) == self.on_topic)
    }
}

/// Matches requests whose first message is this system prompt.
pub struct SystemPrompt(pub &'static str);

impl Match for SystemPrompt {
    fn matches(&self, request: &Request) -> bool {
        body(request).is_some_and(|body| {
            body["messages"][0]["role"] == "system" && body["messages"][0]["content"] == self.0
        })
    }
}

pub fn verdict_reply(matches_domain: bool, reasoning: &str) -> ResponseTemplate {
    let verdict = json!({"matches_domain": matches_domain, "reasoning": reasoning});
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{
            "message": {"role": "assistant", "content": verdict.to_string()},
            "finish_reason": "stop"
        }]
    }))
}

pub fn sse_reply(fragments: &[&str]) -> ResponseTemplate {
    let mut body = String::new();
    for (i, fragment) in fragments.iter().enumerate() {
        let mut chunk = json!({"choices": [{"index": 0, "delta": {"content": fragment}}]});
        if i == 0 {
            chunk["model"] = json!("gemini-2.0-flash-exp");
        }
        if i + 1 == fragments.len() {
            chunk["choices"][0]["finish_reason"] = json!("stop");
        }
        body.push_str(&format!("data: {chunk}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    ResponseTemplate::new(200).set_body_raw(body, "text/event-stream")
}

pub async fn mount_classifier(server: &MockServer, on_topic: bool, expected_calls: u64) {
    let reasoning = if on_topic {
        "The user asks about AgenticAI."
    } else {
        "Not about AgenticAI."
    };
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(ClassifierRequest { on_topic })
        .respond_with(verdict_reply(on_topic, reasoning))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub async fn mount_assistant(server: &MockServer, fragments: &[&str], expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(sse_reply(fragments))
        .expect(expected_calls)
        .mount(server)
        .await;
}
