//! OpenAI Chat Completions backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AgentError;
use crate::llm_provider::LlmProvider;
use crate::model::{CompletionRequest, ModelReply, ToolCall, Usage};
use crate::util::secret_prefix;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path)
    }
}

/// Thin JSON-over-HTTPS client shared by the chat and responses backends.
#[derive(Debug, Clone)]
pub struct OpenAiHttp {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiHttp {
    pub fn new(config: OpenAiConfig) -> Result<Self, AgentError> {
        if config.api_key.trim().is_empty() {
            return Err(AgentError::invalid_request("missing OpenAI API key"));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| {
                AgentError::invalid_request(format!("failed to build HTTP client: {err}"))
            })?;
        info!(
            target: "openai",
            api_base = %config.api_base,
            key = %secret_prefix(&config.api_key),
            "openai client ready"
        );
        Ok(Self { client, config })
    }

    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, AgentError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| AgentError::provider(format!("openai request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<response unavailable>".to_string());
            return Err(AgentError::provider(format!(
                "openai returned {status}: {text}"
            )));
        }

        response
            .json()
            .await
            .map_err(|err| AgentError::provider(format!("openai response invalid: {err}")))
    }
}

pub struct OpenAiLlmProvider {
    http: OpenAiHttp,
}

impl OpenAiLlmProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, AgentError> {
        Ok(Self {
            http: OpenAiHttp::new(config)?,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiLlmProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<ModelReply, AgentError> {
        debug!(
            target: "openai",
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            structured = request.response_format.is_some(),
            "chat completion request"
        );
        let response: ChatCompletionResponse =
            self.http.post_json("chat/completions", request).await?;
        let message = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| AgentError::provider("openai response missing choices"))?;

        Ok(ModelReply {
            content: message.content.and_then(|content| content.into_text()),
            tool_calls: message.tool_calls,
            usage: response.usage,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    #[serde(default)]
    content: Option<ChatCompletionContent>,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatCompletionContent {
    Text(String),
    Parts(Vec<ChatCompletionPart>),
}

#[derive(Debug, Deserialize)]
struct ChatCompletionPart {
    #[serde(default)]
    text: Option<String>,
}

impl ChatCompletionContent {
    fn into_text(self) -> Option<String> {
        match self {
            ChatCompletionContent::Text(text) => Some(text),
            ChatCompletionContent::Parts(parts) => {
                let joined: Vec<String> = parts.into_iter().filter_map(|part| part.text).collect();
                if joined.is_empty() {
                    None
                } else {
                    Some(joined.join("\n"))
                }
            }
        }
    }
}
