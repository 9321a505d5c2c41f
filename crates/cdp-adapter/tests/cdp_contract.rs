//! Contract tests against a real Chromium binary. Ignored by default because
//! they need Chrome/Chromium on the host machine.

use std::env;

use cdp_adapter::{BrowserPage, CdpConfig, ChromiumBrowser, MouseButton};

fn contract_enabled() -> bool {
    env::var("WEBPILOT_CDP_CONTRACT")
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

fn headless_config() -> CdpConfig {
    CdpConfig {
        headless: true,
        ..CdpConfig::default()
    }
}

#[tokio::test]
#[ignore = "requires Chrome/Chromium; set WEBPILOT_CDP_CONTRACT=1"]
async fn contract_navigate_type_and_capture() {
    if !contract_enabled() {
        eprintln!("skipping CDP contract test (WEBPILOT_CDP_CONTRACT not enabled)");
        return;
    }

    let browser = ChromiumBrowser::launch(headless_config())
        .await
        .expect("launch chromium");
    let page = browser.page();

    page.goto("data:text/html,<input id=q autofocus>")
        .await
        .expect("navigate");
    page.mouse_click(20.0, 20.0, MouseButton::Left)
        .await
        .expect("click");
    page.type_text("webpilot").await.expect("type");
    page.press_key("Control+a").await.expect("select all");
    page.press_key("Backspace").await.expect("backspace");

    let value = page
        .evaluate("document.getElementById('q').value")
        .await
        .expect("evaluate");
    assert_eq!(value, serde_json::json!(""));

    let png = page.screenshot().await.expect("screenshot");
    assert!(png.starts_with(b"\x89PNG"));

    browser.close().await;
}

#[tokio::test]
#[ignore = "requires Chrome/Chromium; set WEBPILOT_CDP_CONTRACT=1"]
async fn contract_rejects_unknown_keys() {
    if !contract_enabled() {
        eprintln!("skipping CDP contract test (WEBPILOT_CDP_CONTRACT not enabled)");
        return;
    }

    let browser = ChromiumBrowser::launch(headless_config())
        .await
        .expect("launch chromium");
    let page = browser.page();
    assert!(page.press_key("ctrl+a").await.is_err());
    browser.close().await;
}
