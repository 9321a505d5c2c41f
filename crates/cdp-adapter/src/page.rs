//! Page handle surface shared by the agent tools and the action dispatcher.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AdapterError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
}

impl MouseButton {
    /// Anything other than `left`/`right` clicks with the left button.
    pub fn from_name(name: &str) -> Self {
        match name {
            "right" => MouseButton::Right,
            _ => MouseButton::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
        }
    }
}

/// One browser tab. Coordinates are CSS pixels relative to the viewport.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    async fn goto(&self, url: &str) -> Result<(), AdapterError>;

    async fn current_url(&self) -> Result<String, AdapterError>;

    async fn mouse_click(&self, x: f64, y: f64, button: MouseButton) -> Result<(), AdapterError>;

    async fn mouse_move(&self, x: f64, y: f64) -> Result<(), AdapterError>;

    async fn type_text(&self, text: &str) -> Result<(), AdapterError>;

    /// Press a key or chord using Playwright-style names (`"Enter"`, `"Control+a"`).
    async fn press_key(&self, key: &str) -> Result<(), AdapterError>;

    async fn evaluate(&self, expression: &str) -> Result<Value, AdapterError>;

    /// PNG bytes of the visible viewport.
    async fn screenshot(&self) -> Result<Vec<u8>, AdapterError>;
}
