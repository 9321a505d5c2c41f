use serde_json::Value;
use thiserror::Error;

/// Errors emitted by the agent-core crate.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Raised when an agent request is malformed or missing required fields.
    #[error("invalid agent request: {0}")]
    InvalidRequest(String),

    /// The remote service failed or answered with something unusable.
    #[error("model provider error: {0}")]
    Provider(String),

    /// An input guardrail classified the request as not to be processed.
    #[error("input guardrail '{guardrail}' tripped")]
    InputGuardrailTripwireTriggered {
        guardrail: String,
        output_info: Value,
    },

    /// The model kept calling tools without producing a final answer.
    #[error("max turns ({0}) exceeded")]
    MaxTurnsExceeded(usize),

    /// The final output did not match the agent's structured output type.
    #[error("failed to parse structured output: {0}")]
    OutputParse(String),
}

impl AgentError {
    /// Helper for wrapping static string errors.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Helper for remote service failures.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    pub fn is_guardrail_tripwire(&self) -> bool {
        matches!(self, Self::InputGuardrailTripwireTriggered { .. })
    }
}

/// Failures raised by a tool invocation. The runner turns these into text
/// returned to the model instead of aborting the run.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{0}")]
    Execution(String),
}
