//! Application configuration.
//!
//! Values come from a YAML file (see `cli::runtime::load_config`) and are
//! then overridden by environment variables.

use std::path::PathBuf;
use std::time::Duration;

use agent_core::openai::DEFAULT_API_BASE;
use agent_core::{OpenAiConfig, RunConfig};
use cdp_adapter::CdpConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const API_KEY_PLACEHOLDER: &str = "your_api_key_here";
pub const GOOGLE_URL: &str = "https://www.google.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("OpenAI API key not set or invalid; set OPENAI_API_KEY in your environment or .env file")]
    MissingApiKey,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub openai: OpenAiSettings,
    pub browser: BrowserSettings,
    pub cua: CuaSettings,
    pub server: ServerSettings,
    pub search: SearchSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub timeout_secs: u64,
    pub max_turns: usize,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: agent_core::runner::DEFAULT_MODEL.to_string(),
            temperature: None,
            timeout_secs: 120,
            max_turns: agent_core::runner::DEFAULT_MAX_TURNS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub start_url: String,
    pub headless: bool,
    pub chrome: Option<PathBuf>,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            start_url: GOOGLE_URL.to_string(),
            headless: false,
            chrome: None,
            viewport_width: 1024,
            viewport_height: 768,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CuaSettings {
    pub max_steps: usize,
    pub settle_ms: u64,
}

impl Default for CuaSettings {
    fn default() -> Self {
        Self {
            max_steps: 50,
            settle_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub queue_limit: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7860,
            queue_limit: 20,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub serpapi_key: Option<String>,
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl AppConfig {
    /// Apply environment overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup` (an environment accessor).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("OPENAI_API_KEY").and_then(non_empty) {
            self.openai.api_key = Some(key);
        }
        if let Some(base) = lookup("OPENAI_API_BASE").and_then(non_empty) {
            self.openai.api_base = base;
        }
        if let Some(key) = lookup("SERPAPI_KEY").and_then(non_empty) {
            self.search.serpapi_key = Some(key);
        }
        if let Some(url) = lookup("DEFAULT_START_URL").and_then(non_empty) {
            self.browser.start_url = url;
        }
        if let Some(flag) = lookup("WEBPILOT_HEADLESS") {
            self.browser.headless = truthy(&flag);
        }
        if let Some(path) = lookup("WEBPILOT_CHROME").and_then(non_empty) {
            self.browser.chrome = Some(PathBuf::from(path));
        }
    }

    /// The OpenAI key; the `.env` template placeholder counts as missing.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        match self.openai.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() && key != API_KEY_PLACEHOLDER => Ok(key),
            _ => Err(ConfigError::MissingApiKey),
        }
    }

    pub fn openai_config(&self) -> Result<OpenAiConfig, ConfigError> {
        let mut config = OpenAiConfig::new(self.api_key()?).with_api_base(&self.openai.api_base);
        config.timeout = Duration::from_secs(self.openai.timeout_secs);
        Ok(config)
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            model: self.openai.model.clone(),
            temperature: self.openai.temperature,
            max_turns: self.openai.max_turns,
        }
    }

    pub fn cdp_config(&self) -> CdpConfig {
        let mut config = CdpConfig {
            headless: self.browser.headless,
            viewport_width: self.browser.viewport_width,
            viewport_height: self.browser.viewport_height,
            ..CdpConfig::default()
        };
        if let Some(chrome) = self.browser.chrome.clone() {
            config.executable = Some(chrome);
        }
        config
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.cua.settle_ms)
    }
}
