//! Agent descriptors.

use std::fmt;
use std::sync::Arc;

use schemars::JsonSchema;
use serde_json::Value;

use crate::errors::AgentError;
use crate::guardrails::InputGuardrail;
use crate::model::ResponseFormat;
use crate::tool::{schema_value, Tool};

/// JSON schema the final answer of an agent must follow.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: String,
    pub schema: Value,
}

impl OutputSchema {
    pub fn of<T: JsonSchema>() -> Self {
        Self {
            name: T::schema_name(),
            schema: schema_value::<T>(),
        }
    }

    pub fn response_format(&self) -> ResponseFormat {
        ResponseFormat::json_schema(self.name.clone(), self.schema.clone())
    }
}

/// Immutable description of one agent: instructions, tools and the agents it
/// may hand the conversation to.
#[derive(Clone)]
pub struct Agent {
    pub name: String,
    pub instructions: String,
    pub model: Option<String>,
    pub tools: Vec<Arc<dyn Tool>>,
    pub handoffs: Vec<Agent>,
    pub handoff_description: Option<String>,
    pub output_schema: Option<OutputSchema>,
    pub input_guardrails: Vec<Arc<dyn InputGuardrail>>,
}

impl Agent {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            model: None,
            tools: Vec::new(),
            handoffs: Vec::new(),
            handoff_description: None,
            output_schema: None,
            input_guardrails: Vec::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_tools(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn with_handoff(mut self, agent: Agent) -> Self {
        self.handoffs.push(agent);
        self
    }

    pub fn with_handoff_description(mut self, description: impl Into<String>) -> Self {
        self.handoff_description = Some(description.into());
        self
    }

    pub fn with_output_schema(mut self, schema: OutputSchema) -> Self {
        self.output_schema = Some(schema);
        self
    }

    pub fn with_input_guardrail(mut self, guardrail: Arc<dyn InputGuardrail>) -> Self {
        self.input_guardrails.push(guardrail);
        self
    }

    /// Name and instructions must be non-empty.
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.name.trim().is_empty() {
            return Err(AgentError::invalid_request("agent name cannot be empty"));
        }
        if self.instructions.trim().is_empty() {
            return Err(AgentError::invalid_request(format!(
                "agent '{}' has no instructions",
                self.name
            )));
        }
        Ok(())
    }

    pub fn find_tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model)
            .field(
                "tools",
                &self.tools.iter().map(|tool| tool.name()).collect::<Vec<_>>(),
            )
            .field(
                "handoffs",
                &self
                    .handoffs
                    .iter()
                    .map(|agent| agent.name.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("structured", &self.output_schema.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_instructions_are_rejected() {
        let err = Agent::new("helper", "  ").validate().unwrap_err();
        assert!(matches!(err, AgentError::InvalidRequest(_)));
    }

    #[test]
    fn builder_collects_handoffs() {
        let agent = Agent::new("triage", "route questions")
            .with_handoff(Agent::new("History Tutor", "answer history"))
            .with_model("gpt-4o");
        assert_eq!(agent.handoffs.len(), 1);
        assert_eq!(agent.model.as_deref(), Some("gpt-4o"));
    }
}
