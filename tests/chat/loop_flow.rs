use super::support::{config_for, mount_assistant, mount_classifier};
use guardchat::agent::{ChatLoop, FAREWELL, INPUT_BLOCKED_NOTICE, PROMPT};
use guardchat::app::build_agent;
use guardchat::config::RejectedTurnPolicy;
use guardchat::llm::{MessageRole, create_provider};
use guardchat::{ChatError, Config, History, LlmError};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn run_chat(config: &Config, input: &str) -> (guardchat::Result<History>, String) {
    let provider = create_provider(config);
    let agent = build_agent(config, &provider, true);
    let mut output = Vec::new();
    let result = ChatLoop::new(&agent, input.as_bytes(), &mut output, config.chat.clone())
        .run()
        .await;
    (result, String::from_utf8(output).unwrap())
}

#[tokio::test]
async fn accepted_then_blocked_then_exit() {
    let server = MockServer::start().await;
    mount_classifier(&server, false, 1).await;
    mount_classifier(&server, true, 1).await;
    mount_assistant(&server, &["Hi! ", "How can I ", "help you today?"], 1).await;

    let config = config_for(&server);
    let (history, out) = run_chat(&config, "hello\nWhat is AgenticAI?\nexit\n").await;
    let history = history.unwrap();

    let turns: Vec<_> = history
        .turns()
        .iter()
        .map(|t| (t.role, t.content.as_str()))
        .collect();
    assert_eq!(
        turns,
        vec![
            (MessageRole::User, "hello"),
            (MessageRole::Assistant, "Hi! How can I help you today?"),
            (MessageRole::User, "What is AgenticAI?"),
        ]
    );

    let expected = format!(
        "{PROMPT}Hi! How can I help you today?\nAssistant: Hi! How can I help you today?\n\
         {PROMPT}{INPUT_BLOCKED_NOTICE}\n\
         {PROMPT}{FAREWELL}\n"
    );
    assert_eq!(out, expected);
}

#[tokio::test]
async fn dropped_rejections_never_reach_the_assistant() {
    let server = MockServer::start().await;
    mount_classifier(&server, true, 1).await;
    mount_classifier(&server, false, 1).await;
    mount_assistant(&server, &["Sure, what is your order number?"], 1).await;

    let mut config = config_for(&server);
    config.chat.rejected_turns = RejectedTurnPolicy::Drop;
    let (history, _) = run_chat(&config, "Tell me about AgenticAI\ntrack my order\n").await;
    let history = history.unwrap();
    assert_eq!(history.len(), 2);

    let requests = server.received_requests().await.unwrap();
    let assistant_request = requests
        .iter()
        .find(|r| r.body_json::<serde_json::Value>().unwrap()["stream"] == true)
        .unwrap();
    let body: serde_json::Value = assistant_request.body_json().unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["content"], "track my order");
}

#[tokio::test]
async fn backend_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let (result, out) = run_chat(&config, "hello\nexit\n").await;

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        ChatError::Llm(LlmError::Status { status: 500, .. })
    ));
    assert!(!out.contains(FAREWELL));
}

#[tokio::test]
async fn malformed_assistant_stream_ends_the_loop() {
    let server = MockServer::start().await;
    mount_classifier(&server, false, 1).await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "data: {\"error\":{\"code\":500,\"message\":\"overloaded\"}}\n\n\
             data: garbage{{\n\n",
            "text/event-stream",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let (result, out) = run_chat(&config, "hello\nexit\n").await;

    let err = result.unwrap_err();
    assert!(matches!(err, ChatError::Llm(LlmError::Streaming(_))));
    assert!(err.to_string().contains("overloaded"));
    assert!(!out.contains("Assistant:"));
    assert!(!out.contains(FAREWELL));
}

#[tokio::test]
async fn empty_assistant_stream_is_an_error() {
    let server = MockServer::start().await;
    mount_classifier(&server, false, 1).await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_raw("", "text/event-stream"))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let (result, out) = run_chat(&config, "hello\nexit\n").await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("without any response chunk"));
    assert!(!out.contains("Assistant:"));
}
