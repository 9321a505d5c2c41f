//! Error types for action dispatch

use cdp_adapter::{AdapterError, AdapterErrorKind};
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ActionError {
    /// The page failed to load the requested URL
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// CDP communication or protocol error
    #[error("CDP I/O error: {0}")]
    CdpIo(String),

    /// Page script evaluation failed
    #[error("Script error: {0}")]
    Script(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AdapterError> for ActionError {
    fn from(err: AdapterError) -> Self {
        let message = err.to_string();
        match err.kind {
            AdapterErrorKind::Navigation => ActionError::Navigation(message),
            AdapterErrorKind::Script => ActionError::Script(message),
            AdapterErrorKind::CdpIo | AdapterErrorKind::UnknownKey | AdapterErrorKind::Launch => {
                ActionError::CdpIo(message)
            }
            AdapterErrorKind::Internal => ActionError::Internal(message),
        }
    }
}
