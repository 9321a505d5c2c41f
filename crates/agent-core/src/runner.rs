//! The agent run loop.
//!
//! One run is a sequence of model turns. Each turn sends the current agent's
//! instructions, the conversation so far and the agent's tools (plus one
//! transfer tool per handoff). Tool calls are executed in order and their
//! outputs appended; a transfer switches the current agent. The first reply
//! without tool calls ends the run.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::agent::Agent;
use crate::errors::AgentError;
use crate::handoff::{find_handoff, handoff_output, handoff_spec};
use crate::llm_provider::LlmProvider;
use crate::model::{ChatMessage, CompletionRequest, ToolCall};
use crate::util::extract_json_object;

pub const DEFAULT_MAX_TURNS: usize = 10;
pub const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Model used by agents that do not pin their own.
    pub model: String,
    pub temperature: Option<f32>,
    pub max_turns: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunResult {
    pub final_output: String,
    /// Parsed final output when the last agent declares an output schema.
    pub structured: Option<Value>,
    pub last_agent: String,
    pub turns: usize,
    /// Names of the agents transferred to, in order.
    pub handoffs: Vec<String>,
}

impl RunResult {
    pub fn final_output_as<T: DeserializeOwned>(&self) -> Result<T, AgentError> {
        let value = match &self.structured {
            Some(value) => value.clone(),
            None => parse_structured(&self.final_output)?,
        };
        serde_json::from_value(value).map_err(|err| AgentError::OutputParse(err.to_string()))
    }
}

pub struct Runner {
    provider: Arc<dyn LlmProvider>,
    config: RunConfig,
}

impl Runner {
    pub fn new(provider: Arc<dyn LlmProvider>, config: RunConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run `agent` on `input` until it produces a final answer.
    pub fn run<'a>(
        &'a self,
        agent: &'a Agent,
        input: &'a str,
    ) -> BoxFuture<'a, Result<RunResult, AgentError>> {
        self.run_inner(agent, input).boxed()
    }

    #[instrument(skip_all, fields(agent = %agent.name))]
    async fn run_inner(&self, agent: &Agent, input: &str) -> Result<RunResult, AgentError> {
        if input.trim().is_empty() {
            return Err(AgentError::invalid_request("input cannot be empty"));
        }
        agent.validate()?;

        for guardrail in &agent.input_guardrails {
            let verdict = guardrail.check(self, input).await?;
            if verdict.tripwire_triggered {
                warn!(guardrail = guardrail.name(), "input guardrail tripped");
                return Err(AgentError::InputGuardrailTripwireTriggered {
                    guardrail: guardrail.name().to_string(),
                    output_info: verdict.output_info,
                });
            }
        }

        let mut current = agent.clone();
        let mut conversation = vec![ChatMessage::user(input)];
        let mut handoffs = Vec::new();

        for turn in 1..=self.config.max_turns {
            current.validate()?;
            let request = self.build_request(&current, &conversation);
            let reply = self.provider.complete(&request).await?;
            debug!(
                turn,
                agent = %current.name,
                tool_calls = reply.tool_calls.len(),
                "model turn finished"
            );

            if reply.tool_calls.is_empty() {
                let final_output = reply.content.unwrap_or_default();
                let structured = match current.output_schema {
                    Some(_) => Some(parse_structured(&final_output)?),
                    None => None,
                };
                info!(turns = turn, last_agent = %current.name, "run finished");
                return Ok(RunResult {
                    final_output,
                    structured,
                    last_agent: current.name,
                    turns: turn,
                    handoffs,
                });
            }

            let calls = reply.tool_calls.clone();
            conversation.push(reply.into_message());

            let mut next_agent: Option<Agent> = None;
            for call in &calls {
                let output = if next_agent.is_some() {
                    "Ignored: the conversation was already transferred.".to_string()
                } else if let Some(index) = find_handoff(&current, &call.function.name) {
                    let target = current.handoffs[index].clone();
                    let output = handoff_output(&target);
                    next_agent = Some(target);
                    output
                } else {
                    self.invoke_tool(&current, call).await
                };
                conversation.push(ChatMessage::tool(call.id.clone(), output));
            }

            if let Some(next) = next_agent {
                info!(from = %current.name, to = %next.name, "handoff");
                handoffs.push(next.name.clone());
                current = next;
            }
        }

        Err(AgentError::MaxTurnsExceeded(self.config.max_turns))
    }

    fn build_request(&self, agent: &Agent, conversation: &[ChatMessage]) -> CompletionRequest {
        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.push(ChatMessage::system(agent.instructions.clone()));
        messages.extend(conversation.iter().cloned());

        let mut tools: Vec<_> = agent.tools.iter().map(|tool| tool.spec()).collect();
        tools.extend(
            agent
                .handoffs
                .iter()
                .enumerate()
                .map(|(index, target)| handoff_spec(target, index)),
        );

        CompletionRequest {
            model: agent
                .model
                .clone()
                .unwrap_or_else(|| self.config.model.clone()),
            temperature: self.config.temperature,
            messages,
            tools,
            response_format: agent
                .output_schema
                .as_ref()
                .map(|schema| schema.response_format()),
        }
    }

    /// Tool failures become the tool output so the model can react to them.
    async fn invoke_tool(&self, agent: &Agent, call: &ToolCall) -> String {
        let name = call.function.name.as_str();
        let Some(tool) = agent.find_tool(name) else {
            warn!(tool = name, "model called an unknown tool");
            return format!("Error: tool '{name}' is not available.");
        };

        let raw = call.function.arguments.trim();
        let arguments = if raw.is_empty() {
            Value::Object(Default::default())
        } else {
            match serde_json::from_str::<Value>(raw) {
                Ok(value) => value,
                Err(err) => return format!("Error: invalid arguments for {name}: {err}"),
            }
        };

        debug!(tool = name, %arguments, "invoking tool");
        match tool.call(arguments).await {
            Ok(output) => output,
            Err(err) => {
                warn!(tool = name, %err, "tool failed");
                format!("Error running {name}: {err}")
            }
        }
    }
}

fn parse_structured(text: &str) -> Result<Value, AgentError> {
    let json = extract_json_object(text)
        .ok_or_else(|| AgentError::OutputParse(format!("no JSON object in output: {text}")))?;
    serde_json::from_str(json).map_err(|err| AgentError::OutputParse(err.to_string()))
}
