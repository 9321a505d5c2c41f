use super::browse::cmd_browse;
use super::cua::cmd_cua;
use super::env::CliArgs;
use super::learn::cmd_learn;
use super::serve::cmd_serve;
use super::setup::cmd_setup;
use super::weather::cmd_weather;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Weather(args) => cmd_weather(args, ctx).await,
        Commands::Browse => cmd_browse(ctx).await,
        Commands::Cua => cmd_cua(ctx).await,
        Commands::Learn(args) => cmd_learn(args, ctx).await,
        Commands::Serve(args) => cmd_serve(args, ctx).await,
        Commands::Setup => cmd_setup(ctx).await,
    }
}
