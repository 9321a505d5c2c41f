//! Browser function tools for tool-calling agents.
//!
//! Every tool answers with a sentence starting with `Successfully` or
//! `Failed to`; page errors never escape as tool errors.

use std::sync::Arc;
use std::time::Duration;

use agent_core::{FunctionTool, Tool};
use cdp_adapter::{BrowserPage, MouseButton};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

use crate::dispatch::normalize_url;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct NavigateArgs {
    /// Website URL to open, e.g. https://www.naver.com
    pub url: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ClickArgs {
    /// Horizontal coordinate in pixels.
    pub x: i64,
    /// Vertical coordinate in pixels.
    pub y: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TypeArgs {
    /// Text to type.
    pub text: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PressKeyArgs {
    /// Key to press, e.g. 'Enter', 'Tab', 'ArrowDown'.
    pub key: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ScrollArgs {
    /// Scroll direction: 'up', 'down', 'left' or 'right'.
    pub direction: String,
    /// Amount to scroll in pixels.
    #[serde(default = "default_scroll_amount")]
    pub amount: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoArgs {}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WaitArgs {
    /// Seconds to wait.
    #[serde(default = "default_wait_seconds")]
    pub seconds: u64,
}

fn default_scroll_amount() -> i64 {
    300
}

fn default_wait_seconds() -> u64 {
    2
}

/// Offsets for `window.scrollBy`. Unknown directions scroll nowhere.
pub fn scroll_offsets(direction: &str, amount: i64) -> (i64, i64) {
    match direction.to_lowercase().as_str() {
        "down" => (0, amount),
        "up" => (0, -amount),
        "right" => (amount, 0),
        "left" => (-amount, 0),
        _ => (0, 0),
    }
}

/// The seven browser tools bound to `page`.
pub fn browser_tools(page: Arc<dyn BrowserPage>) -> Vec<Arc<dyn Tool>> {
    vec![
        navigate_to_url(page.clone()),
        click_element(page.clone()),
        type_text(page.clone()),
        press_key(page.clone()),
        scroll_page(page.clone()),
        get_current_url(page),
        wait(),
    ]
}

fn navigate_to_url(page: Arc<dyn BrowserPage>) -> Arc<dyn Tool> {
    FunctionTool::new(
        "navigate_to_url",
        "Navigate the browser to the given URL.",
        move |args: NavigateArgs| {
            let page = page.clone();
            async move {
                let url = normalize_url(&args.url);
                debug!(url = %url, "tool navigate_to_url");
                match page.goto(&url).await {
                    Ok(()) => format!("Successfully navigated to {url}"),
                    Err(err) => format!("Failed to navigate to {url}: {err}"),
                }
            }
        },
    )
    .into_arc()
}

fn click_element(page: Arc<dyn BrowserPage>) -> Arc<dyn Tool> {
    FunctionTool::new(
        "click_element",
        "Click the browser at the given coordinates.",
        move |args: ClickArgs| {
            let page = page.clone();
            async move {
                let ClickArgs { x, y } = args;
                match page.mouse_click(x as f64, y as f64, MouseButton::Left).await {
                    Ok(()) => format!("Successfully clicked at coordinates ({x}, {y})"),
                    Err(err) => format!("Failed to click at coordinates ({x}, {y}): {err}"),
                }
            }
        },
    )
    .into_arc()
}

fn type_text(page: Arc<dyn BrowserPage>) -> Arc<dyn Tool> {
    FunctionTool::new(
        "type_text",
        "Type text into the focused element.",
        move |args: TypeArgs| {
            let page = page.clone();
            async move {
                match page.type_text(&args.text).await {
                    Ok(()) => format!("Successfully typed: {}", args.text),
                    Err(err) => format!("Failed to type text: {err}"),
                }
            }
        },
    )
    .into_arc()
}

fn press_key(page: Arc<dyn BrowserPage>) -> Arc<dyn Tool> {
    FunctionTool::new(
        "press_key",
        "Press a keyboard key.",
        move |args: PressKeyArgs| {
            let page = page.clone();
            async move {
                match page.press_key(&args.key).await {
                    Ok(()) => format!("Successfully pressed key: {}", args.key),
                    Err(err) => format!("Failed to press key: {err}"),
                }
            }
        },
    )
    .into_arc()
}

fn scroll_page(page: Arc<dyn BrowserPage>) -> Arc<dyn Tool> {
    FunctionTool::new(
        "scroll_page",
        "Scroll the page in a direction by an amount of pixels.",
        move |args: ScrollArgs| {
            let page = page.clone();
            async move {
                let (scroll_x, scroll_y) = scroll_offsets(&args.direction, args.amount);
                let script = format!("window.scrollBy({scroll_x}, {scroll_y})");
                match page.evaluate(&script).await {
                    Ok(_) => format!(
                        "Successfully scrolled {} by {} pixels",
                        args.direction, args.amount
                    ),
                    Err(err) => format!("Failed to scroll: {err}"),
                }
            }
        },
    )
    .into_arc()
}

fn get_current_url(page: Arc<dyn BrowserPage>) -> Arc<dyn Tool> {
    FunctionTool::new(
        "get_current_url",
        "Return the current browser URL.",
        move |_: NoArgs| {
            let page = page.clone();
            async move {
                match page.current_url().await {
                    Ok(url) => url,
                    Err(err) => format!("Failed to get current URL: {err}"),
                }
            }
        },
    )
    .into_arc()
}

fn wait() -> Arc<dyn Tool> {
    FunctionTool::new(
        "wait",
        "Wait for a number of seconds.",
        |args: WaitArgs| async move {
            tokio::time::sleep(Duration::from_secs(args.seconds)).await;
            format!("Successfully waited for {} seconds", args.seconds)
        },
    )
    .into_arc()
}
