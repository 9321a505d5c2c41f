//! Computer-use browsing session.
//!
//! Each task gets a fresh browser. The computer-use model sees a screenshot,
//! proposes one action at a time and receives a new screenshot after every
//! action until it answers with plain messages.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use action_primitives::execute_action;
use agent_core::computer::{ComputerUseProvider, ResponsesRequest, SafetyCheck};
use anyhow::Context;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cdp_adapter::{BrowserPage, CdpConfig, ChromiumBrowser};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{AppConfig, GOOGLE_URL};
use crate::session::{Confirm, TaskHandler};

pub const NAVER_URL: &str = "https://www.naver.com";

pub fn mentions_naver(task: &str) -> bool {
    task.to_lowercase().contains("naver") || task.contains("네이버")
}

/// Start page for `task`: Naver when the task names it, `default` otherwise.
pub fn start_url_for(task: &str, default: &str) -> String {
    if mentions_naver(task) {
        NAVER_URL.to_string()
    } else {
        default.to_string()
    }
}

/// Open `url`, falling back to Google. Returns the URL that was loaded.
pub async fn prepare_start_page(page: &dyn BrowserPage, url: &str) -> anyhow::Result<String> {
    match page.goto(url).await {
        Ok(()) => Ok(url.to_string()),
        Err(err) if url != GOOGLE_URL => {
            warn!(url, error = %err, "start page failed to load; falling back to Google");
            page.goto(GOOGLE_URL)
                .await
                .context("failed to open the fallback start page")?;
            Ok(GOOGLE_URL.to_string())
        }
        Err(err) => Err(err).context("failed to open the start page"),
    }
}

async fn screenshot_b64(page: &dyn BrowserPage) -> anyhow::Result<String> {
    let png = page.screenshot().await.context("failed to take a screenshot")?;
    Ok(STANDARD.encode(png))
}

#[derive(Debug, Clone, Copy)]
pub struct CuaOptions {
    pub max_steps: usize,
    pub settle: Duration,
}

impl Default for CuaOptions {
    fn default() -> Self {
        Self {
            max_steps: 50,
            settle: action_primitives::DEFAULT_SETTLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CuaOutcome {
    /// The model stopped proposing actions.
    Completed { messages: Vec<String> },
    /// A safety check was not acknowledged.
    Cancelled,
    ActionFailed { error: String },
    StepLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuaSummary {
    pub steps: usize,
    pub outcome: CuaOutcome,
    /// Non-fatal problems reported by executed actions.
    pub warnings: Vec<String>,
}

impl fmt::Display for CuaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_outcome(f)?;
        if !self.warnings.is_empty() {
            write!(f, "\nWarnings:")?;
            for warning in &self.warnings {
                write!(f, "\n  - {warning}")?;
            }
        }
        Ok(())
    }
}

impl CuaSummary {
    fn fmt_outcome(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            CuaOutcome::Completed { messages } if messages.is_empty() => {
                write!(f, "Task finished after {} action(s).", self.steps)
            }
            CuaOutcome::Completed { messages } => write!(f, "{}", messages.join("\n")),
            CuaOutcome::Cancelled => write!(f, "Task cancelled: safety check not acknowledged."),
            CuaOutcome::ActionFailed { error } => {
                write!(f, "Stopped after {} action(s): {error}", self.steps)
            }
            CuaOutcome::StepLimit => {
                write!(f, "Stopped after reaching the step limit ({}).", self.steps)
            }
        }
    }
}

fn safety_question(checks: &[SafetyCheck]) -> String {
    let mut question = String::from("The model raised safety checks:");
    for check in checks {
        question.push_str(&format!("\n  [{}] {}", check.code, check.message));
    }
    question.push_str("\nProceed?");
    question
}

/// Drive one task from the first screenshot to the final message.
#[instrument(skip_all, fields(task = %task))]
pub async fn run_cua_loop(
    provider: &dyn ComputerUseProvider,
    page: &dyn BrowserPage,
    confirm: &dyn Confirm,
    task: &str,
    options: CuaOptions,
) -> anyhow::Result<CuaSummary> {
    let screenshot = screenshot_b64(page).await?;
    let mut reply = provider
        .create(&ResponsesRequest::initial(task, &screenshot))
        .await?;
    let mut steps = 0;
    let mut warnings = Vec::new();

    loop {
        let request = {
            let calls = reply.computer_calls();
            let Some(call) = calls.first() else {
                let messages = reply.message_texts();
                info!(steps, "computer-use session finished");
                return Ok(CuaSummary {
                    steps,
                    outcome: CuaOutcome::Completed { messages },
                    warnings,
                });
            };
            if calls.len() > 1 {
                warn!(count = calls.len(), "only the first computer call is executed");
            }
            if steps >= options.max_steps {
                warn!(max_steps = options.max_steps, "step limit reached");
                return Ok(CuaSummary {
                    steps,
                    outcome: CuaOutcome::StepLimit,
                    warnings,
                });
            }

            let acknowledged = call.pending_safety_checks.to_vec();
            if !acknowledged.is_empty()
                && !confirm.confirm(&safety_question(&acknowledged)).await
            {
                info!("safety check declined");
                return Ok(CuaSummary {
                    steps,
                    outcome: CuaOutcome::Cancelled,
                    warnings,
                });
            }

            let report = match execute_action(page, call.action, options.settle).await {
                Ok(report) => report,
                Err(err) => {
                    error!(action = %call.action, error = %err, "action failed");
                    return Ok(CuaSummary {
                        steps,
                        outcome: CuaOutcome::ActionFailed {
                            error: err.to_string(),
                        },
                        warnings,
                    });
                }
            };
            steps += 1;
            debug!(
                action = %report.kind,
                started_at = %report.started_at,
                latency_ms = report.latency_ms,
                noop = report.noop,
                "action done"
            );
            for warning in &report.warnings {
                warn!(action = %report.kind, %warning, "action reported a problem");
            }
            warnings.extend(report.warnings);

            let current_url = page.current_url().await.context("failed to read the page URL")?;
            let screenshot = screenshot_b64(page).await?;
            ResponsesRequest::follow_up(
                &reply.id,
                call.call_id,
                acknowledged,
                &screenshot,
                &current_url,
            )
        };
        reply = provider.create(&request).await?;
    }
}

/// Launches a browser per task and runs the computer-use loop in it.
pub struct CuaTaskHandler {
    provider: Arc<dyn ComputerUseProvider>,
    confirm: Arc<dyn Confirm>,
    cdp: CdpConfig,
    start_url: String,
    options: CuaOptions,
    // Browser of the running task, kept here so an interrupt can close it.
    active: Mutex<Option<ChromiumBrowser>>,
}

impl CuaTaskHandler {
    pub fn new(
        provider: Arc<dyn ComputerUseProvider>,
        confirm: Arc<dyn Confirm>,
        config: &AppConfig,
    ) -> Self {
        Self {
            provider,
            confirm,
            cdp: config.cdp_config(),
            start_url: config.browser.start_url.clone(),
            options: CuaOptions {
                max_steps: config.cua.max_steps,
                settle: config.settle_delay(),
            },
            active: Mutex::new(None),
        }
    }

    pub async fn has_open_browser(&self) -> bool {
        self.active.lock().await.is_some()
    }

    async fn close_active(&self) {
        let browser = self.active.lock().await.take();
        if let Some(browser) = browser {
            browser.close().await;
        }
    }

    /// Run `task` on an already open page.
    pub async fn run_on(&self, page: &dyn BrowserPage, task: &str) -> anyhow::Result<CuaSummary> {
        let url = start_url_for(task, &self.start_url);
        let loaded = prepare_start_page(page, &url).await?;
        info!(url = %loaded, "start page ready");
        run_cua_loop(
            self.provider.as_ref(),
            page,
            self.confirm.as_ref(),
            task,
            self.options,
        )
        .await
    }
}

#[async_trait]
impl TaskHandler for CuaTaskHandler {
    async fn handle(&self, task: &str) -> anyhow::Result<String> {
        let browser = ChromiumBrowser::launch(self.cdp.clone())
            .await
            .context("failed to launch the browser")?;
        let page = browser.page();
        *self.active.lock().await = Some(browser);
        let result = self.run_on(page.as_ref(), task).await;
        self.close_active().await;
        result.map(|summary| summary.to_string())
    }

    async fn release(&self) {
        if self.has_open_browser().await {
            info!("closing the browser of the interrupted task");
        }
        self.close_active().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naver_tasks_start_at_naver() {
        assert_eq!(start_url_for("search Naver for news", GOOGLE_URL), NAVER_URL);
        assert_eq!(start_url_for("네이버에서 날씨 검색", GOOGLE_URL), NAVER_URL);
        assert_eq!(start_url_for("find rust docs", GOOGLE_URL), GOOGLE_URL);
    }

    #[test]
    fn summary_text() {
        let done = CuaSummary {
            steps: 2,
            outcome: CuaOutcome::Completed {
                messages: vec!["It is sunny.".into()],
            },
            warnings: Vec::new(),
        };
        assert_eq!(done.to_string(), "It is sunny.");
        let limit = CuaSummary {
            steps: 50,
            outcome: CuaOutcome::StepLimit,
            warnings: vec!["key press failed: Hyper".into()],
        };
        let text = limit.to_string();
        assert!(text.contains("step limit (50)"));
        assert!(text.ends_with("Warnings:\n  - key press failed: Hyper"));
    }

    #[tokio::test]
    async fn release_without_a_running_task_is_a_noop() {
        let provider = Arc::new(agent_core::computer::MockComputerUse::new());
        let confirm = Arc::new(crate::session::ScriptedPrompt::default());
        let handler = CuaTaskHandler::new(provider, confirm, &AppConfig::default());
        handler.release().await;
        assert!(!handler.has_open_browser().await);
    }
}
