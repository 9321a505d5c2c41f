use cdp_adapter::mock::{PageCall, RecordingPage};
use cdp_adapter::{AdapterErrorKind, BrowserPage, MouseButton};

#[tokio::test]
async fn records_calls_in_order() {
    let page = RecordingPage::new();
    page.goto("https://example.com").await.unwrap();
    page.mouse_click(10.0, 20.0, MouseButton::Right).await.unwrap();
    page.type_text("hello").await.unwrap();

    assert_eq!(
        page.calls(),
        vec![
            PageCall::Goto("https://example.com".to_string()),
            PageCall::Click {
                x: 10.0,
                y: 20.0,
                button: MouseButton::Right
            },
            PageCall::Type("hello".to_string()),
        ]
    );
    assert_eq!(page.current_url().await.unwrap(), "https://example.com");
}

#[tokio::test]
async fn press_key_validates_names() {
    let page = RecordingPage::new();
    assert!(page.press_key("Control+a").await.is_ok());
    let err = page.press_key("ctrl+a").await.unwrap_err();
    assert_eq!(err.kind, AdapterErrorKind::UnknownKey);
}

#[tokio::test]
async fn scripted_failures_surface_as_errors() {
    let page = RecordingPage::new();
    page.fail_on("screenshot");
    page.fail_navigation_to("https://down.example");

    assert!(page.screenshot().await.is_err());
    assert!(page.goto("https://down.example").await.is_err());
    assert_eq!(page.current_url().await.unwrap(), "about:blank");
}
