use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use cdp_adapter::{BrowserPage, ChromiumBrowser};
use tracing::info;

use crate::browser_agent::BrowserAgentHandler;
use crate::cli::context::CliContext;
use crate::computer_use::prepare_start_page;
use crate::session::{run_task_loop, Console};

const BANNER: &str = "==================================================
webpilot - browser automation agent
==================================================
Example tasks:
- Search Google for a Python tutorial
- Check the weather on Naver
- Find OpenAI news on Bing";

pub async fn cmd_browse(ctx: &CliContext) -> Result<()> {
    let runner = ctx.runner()?;
    println!("{BANNER}");

    let browser = ChromiumBrowser::launch(ctx.config().cdp_config())
        .await
        .context("failed to launch the browser")?;
    let page: Arc<dyn BrowserPage> = browser.page();

    let outcome = async {
        let loaded = prepare_start_page(page.as_ref(), &ctx.config().browser.start_url).await?;
        info!(url = %loaded, "browser ready");
        let handler = BrowserAgentHandler::new(runner, page.clone());
        let console = Console::new();
        let summary = run_task_loop(&console, &console, &handler, &mut io::stdout()).await?;
        info!(handled = summary.handled, failed = summary.failed, "console session ended");
        anyhow::Ok(())
    }
    .await;

    browser.close().await;
    outcome
}
