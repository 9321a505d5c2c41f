use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    webpilot_cli::cli::run().await
}
