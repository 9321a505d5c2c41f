//! Action primitives
//!
//! Turns the abstract actions of the computer-use model into page primitive
//! calls, and exposes the same page as a set of function tools for
//! tool-calling agents.

pub mod dispatch;
pub mod errors;
pub mod tools;
pub mod types;

pub use dispatch::{execute_action, normalize_url, DEFAULT_SETTLE};
pub use errors::ActionError;
pub use tools::{browser_tools, scroll_offsets};
pub use types::ActionReport;
