//! Wire types of the Responses API as used by the computer-use model.

use serde::{Deserialize, Serialize};

use super::action::ComputerAction;

pub const COMPUTER_USE_MODEL: &str = "computer-use-preview";
pub const DISPLAY_WIDTH: u32 = 1024;
pub const DISPLAY_HEIGHT: u32 = 768;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComputerTool {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub display_width: u32,
    pub display_height: u32,
    pub environment: &'static str,
}

impl Default for ComputerTool {
    fn default() -> Self {
        Self {
            kind: "computer_use_preview",
            display_width: DISPLAY_WIDTH,
            display_height: DISPLAY_HEIGHT,
            environment: "browser",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SafetyCheck {
    pub id: String,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputContent {
    InputText { text: String },
    InputImage { image_url: String },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScreenshotOutput {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputItem {
    Message {
        role: &'static str,
        content: Vec<InputContent>,
    },
    ComputerCallOutput {
        call_id: String,
        acknowledged_safety_checks: Vec<SafetyCheck>,
        output: ScreenshotOutput,
        current_url: String,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResponsesRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<String>,
    pub tools: Vec<ComputerTool>,
    pub input: Vec<InputItem>,
    pub truncation: &'static str,
}

fn png_data_url(screenshot_b64: &str) -> String {
    format!("data:image/png;base64,{screenshot_b64}")
}

impl ResponsesRequest {
    /// First request of a session: the task plus a screenshot of the start page.
    pub fn initial(task: &str, screenshot_b64: &str) -> Self {
        Self {
            model: COMPUTER_USE_MODEL.to_string(),
            instructions: Some(format!("You are a helpful web browsing assistant. {task}")),
            previous_response_id: None,
            tools: vec![ComputerTool::default()],
            input: vec![InputItem::Message {
                role: "user",
                content: vec![
                    InputContent::InputText {
                        text: task.to_string(),
                    },
                    InputContent::InputImage {
                        image_url: png_data_url(screenshot_b64),
                    },
                ],
            }],
            truncation: "auto",
        }
    }

    /// Report the outcome of `call_id` with a fresh screenshot.
    pub fn follow_up(
        previous_response_id: &str,
        call_id: &str,
        acknowledged_safety_checks: Vec<SafetyCheck>,
        screenshot_b64: &str,
        current_url: &str,
    ) -> Self {
        Self {
            model: COMPUTER_USE_MODEL.to_string(),
            instructions: None,
            previous_response_id: Some(previous_response_id.to_string()),
            tools: vec![ComputerTool::default()],
            input: vec![InputItem::ComputerCallOutput {
                call_id: call_id.to_string(),
                acknowledged_safety_checks,
                output: ScreenshotOutput {
                    kind: "computer_screenshot",
                    image_url: png_data_url(screenshot_b64),
                },
                current_url: current_url.to_string(),
            }],
            truncation: "auto",
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputContent {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    ComputerCall {
        call_id: String,
        action: ComputerAction,
        #[serde(default)]
        pending_safety_checks: Vec<SafetyCheck>,
    },
    Message {
        #[serde(default)]
        content: Vec<OutputContent>,
    },
    #[serde(other)]
    Other,
}

/// A computer call picked out of a reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputerCall<'a> {
    pub call_id: &'a str,
    pub action: &'a ComputerAction,
    pub pending_safety_checks: &'a [SafetyCheck],
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ResponsesReply {
    pub id: String,
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

impl ResponsesReply {
    pub fn computer_calls(&self) -> Vec<ComputerCall<'_>> {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::ComputerCall {
                    call_id,
                    action,
                    pending_safety_checks,
                } => Some(ComputerCall {
                    call_id,
                    action,
                    pending_safety_checks,
                }),
                _ => None,
            })
            .collect()
    }

    /// Text of every assistant message in the reply.
    pub fn message_texts(&self) -> Vec<String> {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message { content } => {
                    let text: Vec<&str> = content
                        .iter()
                        .filter_map(|part| part.text.as_deref())
                        .collect();
                    (!text.is_empty()).then(|| text.join("\n"))
                }
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn initial_request_shape() {
        let value = serde_json::to_value(ResponsesRequest::initial("find news", "AAA")).unwrap();
        assert_eq!(value["model"], "computer-use-preview");
        assert_eq!(
            value["instructions"],
            "You are a helpful web browsing assistant. find news"
        );
        assert_eq!(value["tools"][0]["type"], "computer_use_preview");
        assert_eq!(value["tools"][0]["display_width"], 1024);
        assert_eq!(value["tools"][0]["environment"], "browser");
        assert_eq!(value["truncation"], "auto");
        let content = &value["input"][0]["content"];
        assert_eq!(content[0], json!({"type": "input_text", "text": "find news"}));
        assert_eq!(content[1]["image_url"], "data:image/png;base64,AAA");
        assert!(value.get("previous_response_id").is_none());
    }

    #[test]
    fn follow_up_carries_call_output() {
        let check = SafetyCheck {
            id: "sc_1".into(),
            code: "malicious_instructions".into(),
            message: "careful".into(),
        };
        let value = serde_json::to_value(ResponsesRequest::follow_up(
            "resp_1",
            "call_1",
            vec![check],
            "BBB",
            "https://www.google.com/",
        ))
        .unwrap();
        assert_eq!(value["previous_response_id"], "resp_1");
        let item = &value["input"][0];
        assert_eq!(item["type"], "computer_call_output");
        assert_eq!(item["call_id"], "call_1");
        assert_eq!(item["acknowledged_safety_checks"][0]["id"], "sc_1");
        assert_eq!(item["output"]["type"], "computer_screenshot");
        assert_eq!(item["current_url"], "https://www.google.com/");
    }

    #[test]
    fn reply_items_are_classified() {
        let reply: ResponsesReply = serde_json::from_value(json!({
            "id": "resp_2",
            "output": [
                {"type": "reasoning", "summary": []},
                {"type": "computer_call", "call_id": "c1",
                 "action": {"type": "keypress", "keys": ["CTRL", "L"]},
                 "pending_safety_checks": []},
                {"type": "message", "content": [{"type": "output_text", "text": "done"}]}
            ]
        }))
        .unwrap();
        let calls = reply.computer_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].call_id, "c1");
        assert_eq!(calls[0].action.kind(), "keypress");
        assert_eq!(reply.message_texts(), vec!["done".to_string()]);
    }
}
