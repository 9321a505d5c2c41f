//! Web chat front end for the learning assistant.

mod router;
mod state;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

pub use router::{build_router, ChatRequest, ChatResponse};
pub use state::{ChatQueue, QueueFull, ServeState};

pub async fn serve(addr: SocketAddr, state: ServeState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "chat server listening");
    info!("Open http://localhost:{} in a browser", addr.port());
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await
        .context("chat server failed")
}
