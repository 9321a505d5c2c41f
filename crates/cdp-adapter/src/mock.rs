//! Recording page handle for tests and offline runs.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AdapterError, AdapterErrorKind};
use crate::keys::parse_chord;
use crate::page::{BrowserPage, MouseButton};

/// One primitive invocation observed by [`RecordingPage`].
#[derive(Clone, Debug, PartialEq)]
pub enum PageCall {
    Goto(String),
    CurrentUrl,
    Click { x: f64, y: f64, button: MouseButton },
    Move { x: f64, y: f64 },
    Type(String),
    Press(String),
    Evaluate(String),
    Screenshot,
}

impl PageCall {
    pub fn name(&self) -> &'static str {
        match self {
            PageCall::Goto(_) => "goto",
            PageCall::CurrentUrl => "current_url",
            PageCall::Click { .. } => "mouse_click",
            PageCall::Move { .. } => "mouse_move",
            PageCall::Type(_) => "type_text",
            PageCall::Press(_) => "press_key",
            PageCall::Evaluate(_) => "evaluate",
            PageCall::Screenshot => "screenshot",
        }
    }
}

/// Records every call. `press_key` validates key names like the real page,
/// and individual primitives or URLs can be scripted to fail.
#[derive(Default)]
pub struct RecordingPage {
    calls: Mutex<Vec<PageCall>>,
    url: Mutex<String>,
    failing: Mutex<HashSet<&'static str>>,
    failing_urls: Mutex<HashSet<String>>,
}

const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nwebpilot";

impl RecordingPage {
    pub fn new() -> Self {
        Self {
            url: Mutex::new("about:blank".to_string()),
            ..Default::default()
        }
    }

    pub fn at(url: impl Into<String>) -> Self {
        let page = Self::new();
        *lock(&page.url) = url.into();
        page
    }

    /// Make every call of the named primitive (e.g. `"mouse_click"`) fail.
    pub fn fail_on(&self, primitive: &'static str) {
        lock(&self.failing).insert(primitive);
    }

    pub fn fail_navigation_to(&self, url: impl Into<String>) {
        lock(&self.failing_urls).insert(url.into());
    }

    pub fn calls(&self) -> Vec<PageCall> {
        lock(&self.calls).clone()
    }

    pub fn clear(&self) {
        lock(&self.calls).clear();
    }

    fn record(&self, call: PageCall) -> Result<(), AdapterError> {
        let name = call.name();
        lock(&self.calls).push(call);
        if lock(&self.failing).contains(name) {
            return Err(AdapterError::new(AdapterErrorKind::CdpIo)
                .with_hint(format!("scripted failure for {name}")));
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl BrowserPage for RecordingPage {
    async fn goto(&self, url: &str) -> Result<(), AdapterError> {
        self.record(PageCall::Goto(url.to_string()))?;
        if lock(&self.failing_urls).contains(url) {
            return Err(AdapterError::new(AdapterErrorKind::Navigation)
                .with_hint(format!("{url}: scripted failure")));
        }
        *lock(&self.url) = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String, AdapterError> {
        self.record(PageCall::CurrentUrl)?;
        Ok(lock(&self.url).clone())
    }

    async fn mouse_click(&self, x: f64, y: f64, button: MouseButton) -> Result<(), AdapterError> {
        self.record(PageCall::Click { x, y, button })
    }

    async fn mouse_move(&self, x: f64, y: f64) -> Result<(), AdapterError> {
        self.record(PageCall::Move { x, y })
    }

    async fn type_text(&self, text: &str) -> Result<(), AdapterError> {
        self.record(PageCall::Type(text.to_string()))
    }

    async fn press_key(&self, key: &str) -> Result<(), AdapterError> {
        self.record(PageCall::Press(key.to_string()))?;
        parse_chord(key).map(|_| ())
    }

    async fn evaluate(&self, expression: &str) -> Result<Value, AdapterError> {
        self.record(PageCall::Evaluate(expression.to_string()))?;
        Ok(Value::Null)
    }

    async fn screenshot(&self) -> Result<Vec<u8>, AdapterError> {
        self.record(PageCall::Screenshot)?;
        Ok(FAKE_PNG.to_vec())
    }
}
