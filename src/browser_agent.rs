//! Tool-driven browser agent: a chat model steering one shared page through
//! the browser function tools.

use std::sync::Arc;

use action_primitives::browser_tools;
use agent_core::{Agent, Runner};
use anyhow::Context;
use async_trait::async_trait;
use cdp_adapter::BrowserPage;
use tracing::info;

use crate::computer_use::{mentions_naver, NAVER_URL};
use crate::session::TaskHandler;

pub const BROWSER_AGENT_MODEL: &str = "gpt-4o";

const BROWSER_AGENT_INSTRUCTIONS: &str = "You are an assistant that automates a web browser. \
Control the browser according to the user's request using the provided tools: visit pages, \
click, type text, press keys and scroll. For complex tasks, work step by step and explain the \
result of each step. Protect the user's privacy and browse safely.";

pub fn browser_agent(page: Arc<dyn BrowserPage>) -> Agent {
    Agent::new("Browser Automation Assistant", BROWSER_AGENT_INSTRUCTIONS)
        .with_model(BROWSER_AGENT_MODEL)
        .with_tools(browser_tools(page))
}

/// The agent input: the task plus where the browser currently is.
pub fn task_with_context(task: &str, current_url: &str) -> String {
    format!(
        "Task: {task}\nCurrent URL: {current_url}\n\n\
         Please perform the browser actions needed to complete the task above."
    )
}

/// Runs every console task against the same page.
pub struct BrowserAgentHandler {
    runner: Runner,
    agent: Agent,
    page: Arc<dyn BrowserPage>,
}

impl BrowserAgentHandler {
    pub fn new(runner: Runner, page: Arc<dyn BrowserPage>) -> Self {
        Self {
            runner,
            agent: browser_agent(page.clone()),
            page,
        }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }
}

#[async_trait]
impl TaskHandler for BrowserAgentHandler {
    async fn handle(&self, task: &str) -> anyhow::Result<String> {
        let mut current_url = self.page.current_url().await?;
        if mentions_naver(task) && current_url.contains("google.com") {
            info!("task mentions Naver; switching start page");
            self.page
                .goto(NAVER_URL)
                .await
                .context("failed to open Naver")?;
            current_url = self.page.current_url().await?;
        }

        let input = task_with_context(task, &current_url);
        let result = self.runner.run(&self.agent, &input).await?;
        info!(turns = result.turns, "browser agent finished");
        Ok(result.final_output)
    }
}
