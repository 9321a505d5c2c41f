//! Agent core primitives.
//!
//! Agent descriptors, function tools, handoffs and input guardrails, plus the
//! run loop that drives them against a chat completion backend and the
//! client for the computer-use model.

pub mod agent;
pub mod computer;
pub mod errors;
pub mod guardrails;
pub mod handoff;
pub mod llm_provider;
pub mod model;
pub mod openai;
pub mod runner;
pub mod tool;
pub mod util;

pub use agent::{Agent, OutputSchema};
pub use errors::{AgentError, ToolError};
pub use guardrails::{AgentGuardrail, ContentCheck, GuardrailOutput, InputGuardrail};
pub use llm_provider::{LlmProvider, MockLlmProvider};
pub use model::{
    ChatMessage, CompletionRequest, ConversationRole, ConversationTurn, ModelReply, ToolCall,
    ToolSpec,
};
pub use openai::{OpenAiConfig, OpenAiLlmProvider};
pub use runner::{RunConfig, RunResult, Runner};
pub use tool::{FunctionTool, Tool};
