//! Input guardrails run before the starting agent sees the request.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::agent::{Agent, OutputSchema};
use crate::errors::AgentError;
use crate::runner::Runner;

/// Verdict of one guardrail.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardrailOutput {
    pub tripwire_triggered: bool,
    pub output_info: Value,
}

#[async_trait]
pub trait InputGuardrail: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self, runner: &Runner, input: &str) -> Result<GuardrailOutput, AgentError>;
}

/// Moderation verdict produced by the content checking agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ContentCheck {
    /// Whether the request is appropriate for an educational assistant.
    pub is_appropriate: bool,
    /// Short explanation of the verdict.
    pub reasoning: String,
    /// Whether the request asks for harmful content.
    #[serde(default)]
    pub contains_harmful_content: bool,
}

impl ContentCheck {
    pub fn trips(&self) -> bool {
        !self.is_appropriate || self.contains_harmful_content
    }
}

/// Guardrail that delegates the verdict to a classification agent answering
/// with a [`ContentCheck`].
pub struct AgentGuardrail {
    name: String,
    checker: Agent,
}

impl AgentGuardrail {
    /// The checker's output schema is forced to [`ContentCheck`].
    pub fn new(name: impl Into<String>, checker: Agent) -> Self {
        Self {
            name: name.into(),
            checker: checker.with_output_schema(OutputSchema::of::<ContentCheck>()),
        }
    }

    pub fn checker(&self) -> &Agent {
        &self.checker
    }
}

#[async_trait]
impl InputGuardrail for AgentGuardrail {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self, runner: &Runner, input: &str) -> Result<GuardrailOutput, AgentError> {
        let result = runner.run(&self.checker, input).await?;
        let verdict: ContentCheck = result.final_output_as()?;
        debug!(
            guardrail = %self.name,
            appropriate = verdict.is_appropriate,
            harmful = verdict.contains_harmful_content,
            "content check finished"
        );
        if verdict.trips() {
            info!(guardrail = %self.name, reasoning = %verdict.reasoning, "input rejected");
        }
        Ok(GuardrailOutput {
            tripwire_triggered: verdict.trips(),
            output_info: serde_json::to_value(&verdict)
                .map_err(|err| AgentError::OutputParse(err.to_string()))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harmful_flag_defaults_to_false() {
        let check: ContentCheck =
            serde_json::from_str(r#"{"is_appropriate": true, "reasoning": "fine"}"#).unwrap();
        assert!(!check.contains_harmful_content);
        assert!(!check.trips());
    }

    #[test]
    fn harmful_content_trips_even_when_marked_appropriate() {
        let check = ContentCheck {
            is_appropriate: true,
            reasoning: "borderline".into(),
            contains_harmful_content: true,
        };
        assert!(check.trips());
    }
}
