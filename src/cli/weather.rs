use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::cli::context::CliContext;
use crate::tools::weather::{table_answer, weather_agent, DEFAULT_WEATHER_QUERY};

#[derive(Args, Clone)]
pub struct WeatherArgs {
    /// Question for the weather agent
    pub query: Option<String>,
}

pub async fn cmd_weather(args: WeatherArgs, ctx: &CliContext) -> Result<()> {
    let runner = ctx.runner()?;
    let agent = weather_agent();
    let query = args
        .query
        .unwrap_or_else(|| DEFAULT_WEATHER_QUERY.to_string());
    println!("Question: {query}");
    let result = runner.run(&agent, &query).await?;
    info!(turns = result.turns, "weather agent finished");
    println!("\nAgent answer:\n{}", result.final_output);
    if let Some(reference) = table_answer(&query) {
        println!("\nWeather table:\n{reference}");
    }
    Ok(())
}
