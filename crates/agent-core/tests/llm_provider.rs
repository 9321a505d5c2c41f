use agent_core::{
    AgentError, ChatMessage, CompletionRequest, LlmProvider, MockLlmProvider, ModelReply,
};
use futures::executor::block_on;

fn build_request(question: &str) -> CompletionRequest {
    CompletionRequest {
        model: "gpt-4o".into(),
        temperature: None,
        messages: vec![ChatMessage::system("be brief"), ChatMessage::user(question)],
        tools: Vec::new(),
        response_format: None,
    }
}

#[test]
fn mock_provider_serves_replies_in_order() {
    let provider = MockLlmProvider::new();
    provider.push_text("first").push_text("second");

    let first = block_on(provider.complete(&build_request("a"))).expect("first");
    let second = block_on(provider.complete(&build_request("b"))).expect("second");

    assert_eq!(first, ModelReply::text("first"));
    assert_eq!(second.content.as_deref(), Some("second"));
    assert_eq!(provider.requests()[1].last_user_message(), Some("b"));
}

#[test]
fn drained_queue_without_fallback_is_an_error() {
    let provider = MockLlmProvider::new();
    let err = block_on(provider.complete(&build_request("a"))).unwrap_err();
    assert!(matches!(err, AgentError::Provider(_)));
}

#[test]
fn scripted_errors_surface_as_provider_errors() {
    let provider = MockLlmProvider::always("fallback");
    provider.push_error("openai returned 500");

    let err = block_on(provider.complete(&build_request("a"))).unwrap_err();
    assert!(err.to_string().contains("openai returned 500"));
    let reply = block_on(provider.complete(&build_request("b"))).expect("fallback");
    assert_eq!(reply.content.as_deref(), Some("fallback"));
    assert_eq!(provider.request_count(), 2);
}

#[test]
fn request_serializes_for_the_wire() {
    let value = serde_json::to_value(build_request("hello")).unwrap();
    assert_eq!(value["model"], "gpt-4o");
    assert_eq!(value["messages"][1]["role"], "user");
    assert!(value.get("tools").is_none());
    assert!(value.get("temperature").is_none());
}
