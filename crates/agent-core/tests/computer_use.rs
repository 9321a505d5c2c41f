use agent_core::computer::{
    ComputerAction, ComputerUseProvider, MockComputerUse, ResponsesRequest, SafetyCheck,
};
use serde_json::json;

#[tokio::test]
async fn mock_records_requests_and_replays_replies() {
    let provider = MockComputerUse::new();
    provider
        .push_json(json!({
            "id": "resp_1",
            "output": [{
                "type": "computer_call",
                "call_id": "call_1",
                "action": {"type": "click", "x": 100, "y": 200, "button": "wheel"},
                "pending_safety_checks": [
                    {"id": "sc_1", "code": "irrelevant_domain", "message": "Check the domain"}
                ]
            }]
        }))
        .expect("reply json");

    let request = ResponsesRequest::initial("Search for Rust tutorials", "iVBOR");
    let reply = provider.create(&request).await.expect("reply");

    let calls = reply.computer_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].action,
        &ComputerAction::Click {
            x: 100.0,
            y: 200.0,
            button: "wheel".into()
        }
    );
    assert_eq!(
        calls[0].pending_safety_checks,
        &[SafetyCheck {
            id: "sc_1".into(),
            code: "irrelevant_domain".into(),
            message: "Check the domain".into(),
        }]
    );
    assert_eq!(provider.requests(), vec![request]);
}

#[tokio::test]
async fn exhausted_mock_fails() {
    let provider = MockComputerUse::new();
    let request = ResponsesRequest::initial("anything", "");
    assert!(provider.create(&request).await.is_err());
}

#[test]
fn message_only_reply_has_no_calls() {
    let reply: agent_core::computer::ResponsesReply = serde_json::from_value(json!({
        "id": "resp_9",
        "output": [{"type": "message", "role": "assistant",
                    "content": [{"type": "output_text", "text": "All done."}]}]
    }))
    .unwrap();
    assert!(reply.computer_calls().is_empty());
    assert_eq!(reply.message_texts(), vec!["All done.".to_string()]);
}
