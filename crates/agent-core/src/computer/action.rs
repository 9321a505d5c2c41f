use std::fmt;

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DEFAULT_WAIT_SECS: f64 = 2.0;

/// One abstract UI action proposed by the computer-use model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComputerAction {
    Click {
        x: f64,
        y: f64,
        button: String,
    },
    Scroll {
        x: f64,
        y: f64,
        scroll_x: i64,
        scroll_y: i64,
    },
    Type {
        text: String,
    },
    Keypress {
        keys: Vec<String>,
    },
    /// Seconds to wait.
    Wait {
        duration: f64,
    },
    Navigate {
        url: String,
    },
    Screenshot,
    /// A tag this client does not know. Kept so the loop can log and move on.
    #[serde(skip)]
    Unrecognized(String),
}

impl ComputerAction {
    pub fn kind(&self) -> &str {
        match self {
            ComputerAction::Click { .. } => "click",
            ComputerAction::Scroll { .. } => "scroll",
            ComputerAction::Type { .. } => "type",
            ComputerAction::Keypress { .. } => "keypress",
            ComputerAction::Wait { .. } => "wait",
            ComputerAction::Navigate { .. } => "navigate",
            ComputerAction::Screenshot => "screenshot",
            ComputerAction::Unrecognized(tag) => tag,
        }
    }

    /// Decode from the wire object. Only the presence of required fields is
    /// checked; unknown tags decode to [`ComputerAction::Unrecognized`].
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| de::Error::missing_field("type"))?
            .to_string();

        let action = match tag.as_str() {
            "click" => {
                let raw: ClickFields = fields(value)?;
                ComputerAction::Click {
                    x: raw.x,
                    y: raw.y,
                    button: raw.button,
                }
            }
            "scroll" => {
                let raw: ScrollFields = fields(value)?;
                ComputerAction::Scroll {
                    x: raw.x,
                    y: raw.y,
                    scroll_x: raw.scroll_x,
                    scroll_y: raw.scroll_y,
                }
            }
            "type" => {
                let raw: TypeFields = fields(value)?;
                ComputerAction::Type { text: raw.text }
            }
            "keypress" => {
                let raw: KeypressFields = fields(value)?;
                ComputerAction::Keypress { keys: raw.keys }
            }
            "wait" => {
                let raw: WaitFields = fields(value)?;
                ComputerAction::Wait {
                    duration: raw.duration,
                }
            }
            "navigate" => {
                let raw: NavigateFields = fields(value)?;
                ComputerAction::Navigate { url: raw.url }
            }
            "screenshot" => ComputerAction::Screenshot,
            _ => ComputerAction::Unrecognized(tag),
        };
        Ok(action)
    }
}

impl fmt::Display for ComputerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputerAction::Click { x, y, button } => {
                write!(f, "click at ({x}, {y}) with button '{button}'")
            }
            ComputerAction::Scroll {
                x,
                y,
                scroll_x,
                scroll_y,
            } => write!(f, "scroll at ({x}, {y}) with offsets ({scroll_x}, {scroll_y})"),
            ComputerAction::Type { text } => write!(f, "type text: {text}"),
            ComputerAction::Keypress { keys } => write!(f, "keypress {keys:?}"),
            ComputerAction::Wait { duration } => write!(f, "wait for {duration} seconds"),
            ComputerAction::Navigate { url } => write!(f, "navigate to URL '{url}'"),
            ComputerAction::Screenshot => write!(f, "screenshot"),
            ComputerAction::Unrecognized(tag) => write!(f, "unrecognized action '{tag}'"),
        }
    }
}

impl<'de> Deserialize<'de> for ComputerAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ComputerAction::from_value(value).map_err(de::Error::custom)
    }
}

fn fields<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}

fn default_button() -> String {
    "left".to_string()
}

fn default_wait() -> f64 {
    DEFAULT_WAIT_SECS
}

#[derive(Deserialize)]
struct ClickFields {
    x: f64,
    y: f64,
    #[serde(default = "default_button")]
    button: String,
}

#[derive(Deserialize)]
struct ScrollFields {
    x: f64,
    y: f64,
    #[serde(default)]
    scroll_x: i64,
    #[serde(default)]
    scroll_y: i64,
}

#[derive(Deserialize)]
struct TypeFields {
    text: String,
}

#[derive(Deserialize)]
struct KeypressFields {
    keys: Vec<String>,
}

#[derive(Deserialize)]
struct WaitFields {
    #[serde(default = "default_wait")]
    duration: f64,
}

#[derive(Deserialize)]
struct NavigateFields {
    url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> ComputerAction {
        serde_json::from_value(value).expect("action")
    }

    #[test]
    fn click_defaults_to_left_button() {
        assert_eq!(
            decode(json!({"type": "click", "x": 10, "y": 20})),
            ComputerAction::Click {
                x: 10.0,
                y: 20.0,
                button: "left".into()
            }
        );
    }

    #[test]
    fn scroll_offsets_default_to_zero() {
        assert_eq!(
            decode(json!({"type": "scroll", "x": 1, "y": 2, "scroll_y": 300})),
            ComputerAction::Scroll {
                x: 1.0,
                y: 2.0,
                scroll_x: 0,
                scroll_y: 300
            }
        );
    }

    #[test]
    fn wait_defaults_to_two_seconds() {
        assert_eq!(
            decode(json!({"type": "wait"})),
            ComputerAction::Wait { duration: 2.0 }
        );
    }

    #[test]
    fn unknown_tags_are_kept() {
        let action = decode(json!({"type": "drag", "path": []}));
        assert_eq!(action, ComputerAction::Unrecognized("drag".into()));
        assert_eq!(action.kind(), "drag");
    }

    #[test]
    fn missing_required_field_fails() {
        assert!(serde_json::from_value::<ComputerAction>(json!({"type": "type"})).is_err());
        assert!(serde_json::from_value::<ComputerAction>(json!({"x": 1})).is_err());
    }
}
