//! Mock chat workflow for testing.
//!
//! Scripted replies consumed in order, with call tracking. Raw replies
//! run through the real normalizer, so tests exercise the same decode
//! path as production.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::ports::{ChatResponse, ChatWorkflow, WorkflowError};

use super::normalizer::ResponseNormalizer;

/// A scripted workflow reply.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// A raw wire value, normalized on delivery.
    Raw(Value),
    /// An already-normalized response.
    Response(ChatResponse),
    /// A transport/decode failure.
    Error(WorkflowError),
}

/// Scripted implementation of the chat workflow port.
#[derive(Debug, Clone, Default)]
pub struct MockChatWorkflow {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    summaries: Arc<Mutex<VecDeque<Result<String, WorkflowError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    summary_calls: Arc<Mutex<usize>>,
}

impl MockChatWorkflow {
    /// Creates a mock with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a raw wire reply (goes through the real normalizer).
    pub fn with_raw_reply(self, raw: Value) -> Self {
        self.replies.lock().unwrap().push_back(ScriptedReply::Raw(raw));
        self
    }

    /// Queues an already-normalized response.
    pub fn with_response(self, response: ChatResponse) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Response(response));
        self
    }

    /// Queues a plain-message reply.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        let response = ChatResponse {
            next_message: message.into(),
            ..ChatResponse::default()
        };
        self.with_response(response)
    }

    /// Queues a failure.
    pub fn with_error(self, error: WorkflowError) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Error(error));
        self
    }

    /// Queues a summary reply.
    pub fn with_summary(self, summary: impl Into<String>) -> Self {
        self.summaries.lock().unwrap().push_back(Ok(summary.into()));
        self
    }

    /// Queues a summary failure.
    pub fn with_summary_error(self, error: WorkflowError) -> Self {
        self.summaries.lock().unwrap().push_back(Err(error));
        self
    }

    /// Prompts received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Number of summary calls received.
    pub fn summary_calls(&self) -> usize {
        *self.summary_calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl ChatWorkflow for MockChatWorkflow {
    async fn invoke(&self, prompt: &str) -> Result<ChatResponse, WorkflowError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(ScriptedReply::Raw(raw)) => Ok(ResponseNormalizer::new().normalize(&raw)),
            Some(ScriptedReply::Response(response)) => Ok(response),
            Some(ScriptedReply::Error(error)) => Err(error),
            None => Ok(ChatResponse::empty_low_confidence()),
        }
    }

    async fn generate_summary(&self) -> Result<String, WorkflowError> {
        *self.summary_calls.lock().unwrap() += 1;

        let scripted = self.summaries.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok("Rezumat al conversației.".to_string()))
    }
}
