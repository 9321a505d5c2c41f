//! Computer-use action dispatch
//!
//! Maps each action tag emitted by the computer-use model onto exactly one
//! family of page primitives.

use std::time::Duration;

use agent_core::computer::ComputerAction;
use cdp_adapter::keys::translate_cua_key;
use cdp_adapter::{BrowserPage, MouseButton};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::errors::ActionError;
use crate::types::ActionReport;

/// Delay after every successful action so the page can react.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(500);

/// Prefix `https://` unless the URL already starts with `http`.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

fn seconds(duration: f64) -> Duration {
    Duration::try_from_secs_f64(duration).unwrap_or(Duration::ZERO)
}

/// Execute one action against `page`. Primitive failures are returned;
/// per-key keypress failures are only recorded in the report.
pub async fn execute_action(
    page: &dyn BrowserPage,
    action: &ComputerAction,
    settle: Duration,
) -> Result<ActionReport, ActionError> {
    let mut report = ActionReport::new(action.kind(), Utc::now());
    info!(action = %action, "executing computer action");

    match action {
        ComputerAction::Click { x, y, button } => {
            page.mouse_click(*x, *y, MouseButton::from_name(button))
                .await?;
        }
        ComputerAction::Scroll {
            x,
            y,
            scroll_x,
            scroll_y,
        } => {
            page.mouse_move(*x, *y).await?;
            page.evaluate(&format!("window.scrollBy({scroll_x}, {scroll_y})"))
                .await?;
        }
        ComputerAction::Keypress { keys } => {
            for raw in keys {
                if let Err(warning) = press_one(page, raw).await {
                    report.warnings.push(warning);
                }
            }
        }
        ComputerAction::Type { text } => {
            page.type_text(text).await?;
        }
        ComputerAction::Wait { duration } => {
            tokio::time::sleep(seconds(*duration)).await;
        }
        ComputerAction::Screenshot => {
            // Every action is followed by a screenshot already.
            report.noop = true;
        }
        ComputerAction::Navigate { url } => {
            let target = normalize_url(url);
            debug!(url = %target, "navigating");
            page.goto(&target).await?;
        }
        ComputerAction::Unrecognized(tag) => {
            warn!(action = %tag, "unrecognized action");
            report.noop = true;
        }
    }

    tokio::time::sleep(settle).await;
    Ok(report.finish())
}

/// Press one model-supplied key. When the translated name is rejected and
/// the raw key is a two-part chord such as `ctrl+a`, both halves are
/// translated and pressed as `Control+a`.
async fn press_one(page: &dyn BrowserPage, raw: &str) -> Result<(), String> {
    let mapped = translate_cua_key(raw);
    debug!(key = raw, mapped = %mapped, "keypress");
    let first_err = match page.press_key(&mapped).await {
        Ok(()) => return Ok(()),
        Err(err) => err,
    };
    warn!(key = %mapped, error = %first_err, "key press failed");

    let parts: Vec<&str> = raw.split('+').collect();
    if parts.len() != 2 {
        return Err(format!("key '{mapped}': {first_err}"));
    }
    let chord = format!(
        "{}+{}",
        translate_cua_key(parts[0]),
        translate_cua_key(parts[1])
    );
    debug!(chord = %chord, "retrying as modifier+key");
    page.press_key(&chord).await.map_err(|err| {
        warn!(chord = %chord, error = %err, "modifier+key press failed");
        format!("key '{chord}': {err}")
    })
}
