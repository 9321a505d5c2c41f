//! Command line front end.

pub mod app;
pub mod browse;
pub mod commands;
pub mod context;
pub mod cua;
pub mod dispatch;
pub mod env;
pub mod learn;
pub mod runtime;
pub mod serve;
pub mod setup;
pub mod weather;

pub use app::run;
pub use context::CliContext;
