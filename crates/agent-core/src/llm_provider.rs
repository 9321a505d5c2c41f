use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::AgentError;
use crate::model::{CompletionRequest, ModelReply};

/// Abstraction over chat completion backends so the runner can be driven by
/// a hosted service or by a scripted double.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Produce the next assistant message for the given conversation.
    async fn complete(&self, request: &CompletionRequest) -> Result<ModelReply, AgentError>;
}

/// Deterministic provider used for tests and offline development.
///
/// Replies are served from a queue in order; once the queue is drained the
/// fallback reply (if any) is repeated. Every request is recorded.
#[derive(Debug, Default)]
pub struct MockLlmProvider {
    replies: Mutex<VecDeque<Result<ModelReply, String>>>,
    fallback: Option<ModelReply>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that answers every request with the same text.
    pub fn always(text: impl Into<String>) -> Self {
        Self {
            fallback: Some(ModelReply::text(text)),
            ..Default::default()
        }
    }

    pub fn push_reply(&self, reply: ModelReply) -> &Self {
        lock(&self.replies).push_back(Ok(reply));
        self
    }

    pub fn push_text(&self, text: impl Into<String>) -> &Self {
        self.push_reply(ModelReply::text(text))
    }

    /// Queue a provider failure.
    pub fn push_error(&self, message: impl Into<String>) -> &Self {
        lock(&self.replies).push_back(Err(message.into()));
        self
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<ModelReply, AgentError> {
        lock(&self.requests).push(request.clone());
        match lock(&self.replies).pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(AgentError::provider(message)),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| AgentError::provider("mock provider has no scripted reply")),
        }
    }
}
