use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::learning::LearningAssistant;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("the chat queue is full")]
pub struct QueueFull;

/// Serializes agent runs: one request runs, at most `limit` wait.
#[derive(Clone)]
pub struct ChatQueue {
    gate: Arc<Semaphore>,
    waiting: Arc<AtomicUsize>,
    limit: usize,
}

struct WaitingGuard<'a>(&'a AtomicUsize);

impl Drop for WaitingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ChatQueue {
    pub fn new(limit: usize) -> Self {
        Self {
            gate: Arc::new(Semaphore::new(1)),
            waiting: Arc::new(AtomicUsize::new(0)),
            limit,
        }
    }

    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Take the run slot, waiting in line when it is busy.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, QueueFull> {
        if let Ok(permit) = self.gate.clone().try_acquire_owned() {
            return Ok(permit);
        }
        let ahead = self.waiting.fetch_add(1, Ordering::SeqCst);
        let _guard = WaitingGuard(&self.waiting);
        if ahead >= self.limit {
            return Err(QueueFull);
        }
        self.gate.clone().acquire_owned().await.map_err(|_| QueueFull)
    }
}

#[derive(Clone)]
pub struct ServeState {
    pub assistant: Arc<LearningAssistant>,
    pub queue: ChatQueue,
}

impl ServeState {
    pub fn new(assistant: Arc<LearningAssistant>, queue_limit: usize) -> Self {
        Self {
            assistant,
            queue: ChatQueue::new(queue_limit),
        }
    }
}
