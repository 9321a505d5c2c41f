use std::sync::Arc;

use action_primitives::browser_tools;
use agent_core::Tool;
use cdp_adapter::mock::{PageCall, RecordingPage};
use cdp_adapter::MouseButton;
use serde_json::json;

fn tool(tools: &[Arc<dyn Tool>], name: &str) -> Arc<dyn Tool> {
    tools
        .iter()
        .find(|tool| tool.name() == name)
        .cloned()
        .unwrap_or_else(|| panic!("missing tool {name}"))
}

#[test]
fn exposes_the_seven_browser_tools() {
    let page = Arc::new(RecordingPage::new());
    let names: Vec<String> = browser_tools(page)
        .iter()
        .map(|tool| tool.name().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "navigate_to_url",
            "click_element",
            "type_text",
            "press_key",
            "scroll_page",
            "get_current_url",
            "wait"
        ]
    );
}

#[tokio::test]
async fn successful_calls_report_success() {
    let page = Arc::new(RecordingPage::at("https://www.google.com/"));
    let tools = browser_tools(page.clone());

    let out = tool(&tools, "navigate_to_url")
        .call(json!({"url": "www.naver.com"}))
        .await
        .unwrap();
    assert_eq!(out, "Successfully navigated to https://www.naver.com");

    let out = tool(&tools, "click_element")
        .call(json!({"x": 120, "y": 45}))
        .await
        .unwrap();
    assert_eq!(out, "Successfully clicked at coordinates (120, 45)");

    let out = tool(&tools, "type_text")
        .call(json!({"text": "날씨"}))
        .await
        .unwrap();
    assert_eq!(out, "Successfully typed: 날씨");

    let out = tool(&tools, "press_key")
        .call(json!({"key": "Enter"}))
        .await
        .unwrap();
    assert_eq!(out, "Successfully pressed key: Enter");

    let out = tool(&tools, "scroll_page")
        .call(json!({"direction": "down"}))
        .await
        .unwrap();
    assert_eq!(out, "Successfully scrolled down by 300 pixels");

    let out = tool(&tools, "get_current_url")
        .call(json!({}))
        .await
        .unwrap();
    assert_eq!(out, "https://www.naver.com");

    assert_eq!(
        page.calls(),
        vec![
            PageCall::Goto("https://www.naver.com".into()),
            PageCall::Click {
                x: 120.0,
                y: 45.0,
                button: MouseButton::Left
            },
            PageCall::Type("날씨".into()),
            PageCall::Press("Enter".into()),
            PageCall::Evaluate("window.scrollBy(0, 300)".into()),
            PageCall::CurrentUrl,
        ]
    );
}

#[tokio::test]
async fn page_failures_become_failure_strings() {
    let page = Arc::new(RecordingPage::new());
    page.fail_navigation_to("https://down.example");
    page.fail_on("mouse_click");
    let tools = browser_tools(page.clone());

    let out = tool(&tools, "navigate_to_url")
        .call(json!({"url": "https://down.example"}))
        .await
        .unwrap();
    assert!(out.starts_with("Failed to navigate to https://down.example:"));

    let out = tool(&tools, "click_element")
        .call(json!({"x": 1, "y": 2}))
        .await
        .unwrap();
    assert!(out.starts_with("Failed to click at coordinates (1, 2):"));

    let out = tool(&tools, "press_key")
        .call(json!({"key": "NotAKey"}))
        .await
        .unwrap();
    assert!(out.starts_with("Failed to press key:"));
}

#[tokio::test(start_paused = true)]
async fn wait_defaults_to_two_seconds() {
    let tools = browser_tools(Arc::new(RecordingPage::new()));
    let out = tool(&tools, "wait").call(json!({})).await.unwrap();
    assert_eq!(out, "Successfully waited for 2 seconds");
}
