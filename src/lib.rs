//! webpilot library
//!
//! Exposes modules for integration testing

pub mod browser_agent;
pub mod cli;
pub mod computer_use;
pub mod config;
pub mod learning;
pub mod server;
pub mod session;
pub mod setup;
pub mod tools;

// Re-export commonly used types for external use
pub use config::{AppConfig, ConfigError};
pub use learning::LearningAssistant;
pub use session::{
    run_task_loop, Confirm, Interrupt, InterruptFlag, PromptEvent, PromptSource, TaskHandler,
};
