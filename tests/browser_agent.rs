use std::sync::Arc;

use agent_core::{MockLlmProvider, ModelReply, RunConfig, Runner, ToolCall};
use cdp_adapter::mock::{PageCall, RecordingPage};
use webpilot_cli::browser_agent::{BrowserAgentHandler, BROWSER_AGENT_MODEL};
use webpilot_cli::computer_use::NAVER_URL;
use webpilot_cli::config::GOOGLE_URL;
use webpilot_cli::session::TaskHandler;

fn handler(provider: &Arc<MockLlmProvider>, page: &Arc<RecordingPage>) -> BrowserAgentHandler {
    let runner = Runner::new(provider.clone(), RunConfig::default());
    BrowserAgentHandler::new(runner, page.clone())
}

#[tokio::test]
async fn task_is_sent_with_the_current_url() {
    let provider = Arc::new(MockLlmProvider::new());
    provider
        .push_reply(ModelReply::tool_calls(vec![ToolCall::function(
            "call_nav",
            "navigate_to_url",
            r#"{"url": "www.rust-lang.org"}"#,
        )]))
        .push_text("Opened the Rust homepage.");
    let page = Arc::new(RecordingPage::at(GOOGLE_URL));

    let output = handler(&provider, &page)
        .handle("open the rust homepage")
        .await
        .unwrap();

    assert_eq!(output, "Opened the Rust homepage.");
    assert!(page
        .calls()
        .contains(&PageCall::Goto("https://www.rust-lang.org".to_string())));
    let first = &provider.requests()[0];
    assert_eq!(first.model, BROWSER_AGENT_MODEL);
    let input = first.last_user_message().unwrap();
    assert!(input.starts_with("Task: open the rust homepage\nCurrent URL: https://www.google.com"));
}

#[tokio::test]
async fn naver_task_on_google_switches_first() {
    let provider = Arc::new(MockLlmProvider::always("done"));
    let page = Arc::new(RecordingPage::at(GOOGLE_URL));

    handler(&provider, &page)
        .handle("check the weather on Naver")
        .await
        .unwrap();

    assert!(page.calls().contains(&PageCall::Goto(NAVER_URL.to_string())));
    let input = provider.requests()[0].last_user_message().unwrap().to_string();
    assert!(input.contains(&format!("Current URL: {NAVER_URL}")));
}

#[tokio::test]
async fn naver_task_elsewhere_stays_put() {
    let provider = Arc::new(MockLlmProvider::always("done"));
    let page = Arc::new(RecordingPage::at("https://example.com"));

    handler(&provider, &page)
        .handle("네이버 뉴스 보기")
        .await
        .unwrap();

    assert!(!page
        .calls()
        .iter()
        .any(|call| matches!(call, PageCall::Goto(_))));
}
