use std::io;

use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::cli::context::CliContext;
use crate::learning::LearningAssistant;
use crate::session::{run_task_loop, Console};

#[derive(Args, Clone)]
pub struct LearnArgs {
    /// Skip the demo questions and go straight to the prompt
    #[arg(long)]
    pub skip_demo: bool,
}

pub async fn cmd_learn(args: LearnArgs, ctx: &CliContext) -> Result<()> {
    let assistant = LearningAssistant::new(ctx.runner()?, ctx.web_search());
    let mut stdout = io::stdout();

    if !args.skip_demo {
        assistant.run_demo(&mut stdout).await?;
    }

    let console = Console::new();
    let summary = run_task_loop(&console, &console, &assistant, &mut stdout).await?;
    info!(handled = summary.handled, "learning session ended");
    Ok(())
}
