use std::io;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::cli::context::CliContext;
use crate::computer_use::CuaTaskHandler;
use crate::session::{run_task_loop, Console};

const BANNER: &str = "==================================================
webpilot - computer-use browsing
==================================================
Describe a task; a fresh browser is opened for each one.
Safety checks raised by the model are confirmed here before any action.";

pub async fn cmd_cua(ctx: &CliContext) -> Result<()> {
    let provider = ctx.computer_use()?;
    println!("{BANNER}");

    let console = Console::new();
    let handler = CuaTaskHandler::new(provider, Arc::new(console.clone()), ctx.config());
    let summary = run_task_loop(&console, &console, &handler, &mut io::stdout()).await?;
    info!(handled = summary.handled, failed = summary.failed, "console session ended");
    Ok(())
}
