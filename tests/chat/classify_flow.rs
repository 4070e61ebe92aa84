use super::support::{SystemPrompt, config_for};
use guardchat::agent::{InputGuardrail, ModelGuardrail};
use guardchat::llm::{ProviderMessage, create_provider};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fenced_verdict(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"content": body}, "finish_reason": "stop"}]
    }))
}

#[tokio::test]
async fn classifier_sends_instructions_and_reads_fenced_verdict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(SystemPrompt(
            "Check if the user is asking you about AgenticAI.",
        ))
        .respond_with(fenced_verdict(
            "```json\n{\"matches_domain\": \"true\", \"reasoning\": \"Direct question.\"}\n```",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let classifier = ModelGuardrail::from_config(
        create_provider(&config),
        &config.guardrail,
        &config.model,
        None,
    );
    let output = classifier
        .check(&[ProviderMessage::user("What is AgenticAI?")])
        .await
        .unwrap();

    assert!(output.tripwire_triggered);
    assert_eq!(output.guardrail, "Guardrail check");
    assert_eq!(
        output.output_info,
        json!({"matches_domain": true, "reasoning": "Direct question."})
    );
}

#[tokio::test]
async fn garbled_verdict_is_an_error_not_a_pass() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(fenced_verdict("Looks fine to me!"))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let classifier = ModelGuardrail::from_config(
        create_provider(&config),
        &config.guardrail,
        &config.model,
        None,
    );
    let err = classifier
        .classify(&[ProviderMessage::user("hello")])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("domain_verdict"));
}
