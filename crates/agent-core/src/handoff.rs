//! Handoffs are presented to the model as ordinary function tools; calling
//! one transfers the conversation to the target agent.

use serde_json::json;

use crate::agent::Agent;
use crate::model::ToolSpec;

/// Tool name used to transfer to `agent`. `index` is the position in the
/// parent's handoff list and keeps names unique when the agent name has no
/// ASCII letters or digits.
pub fn handoff_tool_name(agent: &Agent, index: usize) -> String {
    let mut snake = String::new();
    let mut pending_sep = false;
    for ch in agent.name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !snake.is_empty() {
                snake.push('_');
            }
            pending_sep = false;
            snake.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    if snake.is_empty() {
        format!("transfer_to_agent_{index}")
    } else {
        format!("transfer_to_{snake}")
    }
}

pub fn handoff_spec(agent: &Agent, index: usize) -> ToolSpec {
    let description = agent
        .handoff_description
        .clone()
        .unwrap_or_else(|| format!("Handoff to the {} agent to handle the request.", agent.name));
    ToolSpec {
        name: handoff_tool_name(agent, index),
        description,
        parameters: json!({"type": "object", "properties": {}, "additionalProperties": false}),
    }
}

/// Index of the handoff target addressed by `tool_name`.
pub fn find_handoff(agent: &Agent, tool_name: &str) -> Option<usize> {
    agent
        .handoffs
        .iter()
        .enumerate()
        .position(|(index, target)| handoff_tool_name(target, index) == tool_name)
}

/// Tool output recorded in the conversation after a transfer.
pub fn handoff_output(target: &Agent) -> String {
    json!({"assistant": target.name}).to_string()
}
