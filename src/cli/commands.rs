use clap::Subcommand;

use super::learn::LearnArgs;
use super::serve::ServeArgs;
use super::weather::WeatherArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Ask the weather agent a single question
    Weather(WeatherArgs),

    /// Drive a browser with the tool-calling agent from the console
    Browse,

    /// Drive a browser with the computer-use model from the console
    Cua,

    /// Run the learning assistant in the console
    Learn(LearnArgs),

    /// Serve the learning assistant web chat
    Serve(ServeArgs),

    /// Check that a Chrome/Chromium executable is available
    Setup,
}
