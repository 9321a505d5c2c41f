use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::cli::context::CliContext;
use crate::learning::LearningAssistant;
use crate::server::{serve, ServeState};

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Address to bind (defaults to the config value)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (defaults to the config value)
    #[arg(long)]
    pub port: Option<u16>,
}

pub async fn cmd_serve(args: ServeArgs, ctx: &CliContext) -> Result<()> {
    let settings = &ctx.config().server;
    let host = args.host.unwrap_or_else(|| settings.host.clone());
    let port = args.port.unwrap_or(settings.port);
    let ip: IpAddr = host
        .parse()
        .with_context(|| format!("invalid host address: {host}"))?;
    let addr = SocketAddr::new(ip, port);

    let assistant = Arc::new(LearningAssistant::new(ctx.runner()?, ctx.web_search()));
    let state = ServeState::new(assistant, settings.queue_limit);
    info!(queue_limit = settings.queue_limit, "starting learning assistant web chat");
    serve(addr, state).await
}
