use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use super::responses::{ResponsesReply, ResponsesRequest};
use crate::errors::AgentError;
use crate::openai::{OpenAiConfig, OpenAiHttp};

#[async_trait]
pub trait ComputerUseProvider: Send + Sync {
    async fn create(&self, request: &ResponsesRequest) -> Result<ResponsesReply, AgentError>;
}

/// Computer-use model reached through `{api_base}/responses`.
pub struct OpenAiComputerUse {
    http: OpenAiHttp,
}

impl OpenAiComputerUse {
    pub fn new(config: OpenAiConfig) -> Result<Self, AgentError> {
        Ok(Self {
            http: OpenAiHttp::new(config)?,
        })
    }
}

#[async_trait]
impl ComputerUseProvider for OpenAiComputerUse {
    async fn create(&self, request: &ResponsesRequest) -> Result<ResponsesReply, AgentError> {
        debug!(
            target: "openai",
            previous = request.previous_response_id.as_deref().unwrap_or("-"),
            "responses request"
        );
        self.http.post_json("responses", request).await
    }
}

/// Scripted computer-use double.
#[derive(Debug, Default)]
pub struct MockComputerUse {
    replies: Mutex<VecDeque<Result<ResponsesReply, String>>>,
    requests: Mutex<Vec<ResponsesRequest>>,
}

impl MockComputerUse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: ResponsesReply) -> &Self {
        lock(&self.replies).push_back(Ok(reply));
        self
    }

    /// Queue a reply given as wire JSON.
    pub fn push_json(&self, reply: serde_json::Value) -> Result<&Self, serde_json::Error> {
        let reply: ResponsesReply = serde_json::from_value(reply)?;
        Ok(self.push_reply(reply))
    }

    pub fn push_error(&self, message: impl Into<String>) -> &Self {
        lock(&self.replies).push_back(Err(message.into()));
        self
    }

    pub fn requests(&self) -> Vec<ResponsesRequest> {
        lock(&self.requests).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl ComputerUseProvider for MockComputerUse {
    async fn create(&self, request: &ResponsesRequest) -> Result<ResponsesReply, AgentError> {
        lock(&self.requests).push(request.clone());
        match lock(&self.replies).pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(AgentError::provider(message)),
            None => Err(AgentError::provider("mock computer-use has no scripted reply")),
        }
    }
}
