use std::sync::Arc;

use agent_core::{ChatMessage, MockLlmProvider, ModelReply, RunConfig, Runner, ToolCall};
use webpilot_cli::learning::{
    programming_agent, LearningAssistant, DEMO_QUESTIONS, EMPTY_QUESTION_MESSAGE,
    MODERATION_MESSAGE,
};
use webpilot_cli::tools::WebSearch;

const APPROVED: &str = r#"{"is_appropriate": true, "reasoning": "educational", "contains_harmful_content": false}"#;
const REJECTED: &str = r#"{"is_appropriate": false, "reasoning": "asks for hacking instructions", "contains_harmful_content": true}"#;

fn assistant(provider: &Arc<MockLlmProvider>) -> LearningAssistant {
    let runner = Runner::new(provider.clone(), RunConfig::default());
    LearningAssistant::new(runner, Arc::new(WebSearch::new(None)))
}

fn system_prompt(messages: &[ChatMessage]) -> Option<&str> {
    messages.iter().find_map(|message| match message {
        ChatMessage::System { content } => Some(content.as_str()),
        _ => None,
    })
}

#[tokio::test]
async fn inappropriate_question_is_never_forwarded() {
    let provider = Arc::new(MockLlmProvider::new());
    provider.push_text(REJECTED);
    let assistant = assistant(&provider);

    let answer = assistant.answer(DEMO_QUESTIONS[3]).await;

    assert_eq!(answer, MODERATION_MESSAGE);
    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].response_format.is_some());
    assert!(requests[0].tools.is_empty());
}

#[tokio::test]
async fn harmful_flag_alone_trips_the_guardrail() {
    let provider = Arc::new(MockLlmProvider::new());
    provider.push_text(
        r#"{"is_appropriate": true, "reasoning": "borderline", "contains_harmful_content": true}"#,
    );

    let answer = assistant(&provider).answer("how do I pick a lock").await;

    assert_eq!(answer, MODERATION_MESSAGE);
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn approved_question_is_handed_to_the_specialist() {
    let provider = Arc::new(MockLlmProvider::new());
    provider
        .push_text(APPROVED)
        .push_reply(ModelReply::tool_calls(vec![ToolCall::function(
            "call_handoff",
            "transfer_to_programming_assistant",
            "{}",
        )]))
        .push_text("A list is ordered; a dict maps keys to values.");
    let assistant = assistant(&provider);

    let answer = assistant.answer(DEMO_QUESTIONS[0]).await;

    assert_eq!(answer, "A list is ordered; a dict maps keys to values.");
    let requests = provider.requests();
    assert_eq!(requests.len(), 3);
    let triage_tools = requests[1].tool_names();
    assert!(triage_tools.contains(&"transfer_to_programming_assistant"));
    assert!(triage_tools.contains(&"transfer_to_web_search_assistant"));
    assert_eq!(
        system_prompt(&requests[2].messages),
        Some(programming_agent().instructions.as_str())
    );
}

#[tokio::test]
async fn checker_without_harmful_field_defaults_to_safe() {
    let provider = Arc::new(MockLlmProvider::new());
    provider
        .push_text(r#"```json
{"is_appropriate": true, "reasoning": "fine"}
```"#)
        .push_text("Here is the answer.");

    let answer = assistant(&provider).answer("What is a closure?").await;

    assert_eq!(answer, "Here is the answer.");
}

#[tokio::test]
async fn provider_failure_is_rendered_as_error_text() {
    let provider = Arc::new(MockLlmProvider::new());
    provider.push_error("service unavailable");

    let answer = assistant(&provider).answer("What is Rust?").await;

    assert!(answer.starts_with("Error: "), "{answer}");
    assert!(answer.contains("service unavailable"));
}

#[tokio::test]
async fn empty_question_short_circuits() {
    let provider = Arc::new(MockLlmProvider::always(APPROVED));

    let answer = assistant(&provider).answer("   ").await;

    assert_eq!(answer, EMPTY_QUESTION_MESSAGE);
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn demo_prints_every_question() {
    let provider = Arc::new(MockLlmProvider::new());
    for _ in 0..3 {
        provider.push_text(APPROVED).push_text("answer");
    }
    provider.push_text(REJECTED);
    let mut out = Vec::new();

    assistant(&provider).run_demo(&mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    for question in DEMO_QUESTIONS {
        assert!(text.contains(question));
    }
    assert_eq!(text.matches("Answer: answer").count(), 3);
    assert!(text.contains(MODERATION_MESSAGE));
}
