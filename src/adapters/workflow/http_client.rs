//! HTTP adapter for the chat workflow webhook.
//!
//! Speaks the webhook contract: one POST per turn carrying the prompt,
//! the desired response schema, and a timestamp. The reply body is
//! decoded here and handed to the normalizer; everything after the JSON
//! parse is soft.

use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{json, Value};

use crate::domain::foundation::Timestamp;
use crate::ports::{ChatResponse, ChatWorkflow, WorkflowError};

use super::normalizer::{resolve_shape, ResponseNormalizer};

/// Schema sent with every chat turn so the workflow produces the
/// canonical reply shape.
static DEFAULT_RESPONSE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {
            "next_message": {"type": "string"},
            "ticket": {
                "type": "object",
                "properties": {
                    "id": {"type": "integer"},
                    "ticket_id": {"type": "string"},
                    "category": {"type": "string"},
                    "subcategory": {"type": "string"},
                    "description": {"type": "string"},
                    "severity": {"type": "string"},
                    "location_county": {"type": "string"},
                    "location_city": {"type": "string"},
                    "institution": {"type": "string"},
                    "status": {"type": "string"},
                    "summary": {"type": "string"},
                    "tags": {"type": "array", "items": {"type": "string"}},
                    "user_role": {"type": "string"},
                    "user_recommendations": {"type": "string"},
                    "datetime": {"type": "string"}
                }
            },
            "confidence": {"type": "string"}
        },
        "required": ["next_message", "ticket", "confidence"]
    })
});

/// Configuration for the workflow webhook client.
#[derive(Debug, Clone)]
pub struct WorkflowClientConfig {
    /// Chat webhook endpoint.
    pub webhook_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl WorkflowClientConfig {
    /// Creates a configuration for the given webhook URL.
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Webhook-backed implementation of the chat workflow port.
pub struct HttpChatWorkflow {
    config: WorkflowClientConfig,
    client: Client,
    normalizer: ResponseNormalizer,
}

impl HttpChatWorkflow {
    /// Creates a new client with the given configuration.
    pub fn new(config: WorkflowClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            client,
            normalizer: ResponseNormalizer::new(),
        }
    }

    /// Replaces the normalizer (e.g. to swap the reasoning policy).
    pub fn with_normalizer(mut self, normalizer: ResponseNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// POSTs a request body and decodes the reply into JSON.
    async fn post(&self, body: Value) -> Result<Value, WorkflowError> {
        tracing::debug!(url = %self.config.webhook_url, "calling chat workflow");

        let response = self
            .client
            .post(&self.config.webhook_url)
            .json(&body)
            .send()
            .await
            .map_err(|err| WorkflowError::network(err.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| WorkflowError::network(err.to_string()))?;

        if !status.is_success() {
            return Err(WorkflowError::transport(status.as_u16(), text));
        }
        if text.trim().is_empty() {
            return Err(WorkflowError::decode("empty response body", &text));
        }
        serde_json::from_str(&text).map_err(|err| WorkflowError::decode(err.to_string(), &text))
    }
}

#[async_trait::async_trait]
impl ChatWorkflow for HttpChatWorkflow {
    async fn invoke(&self, prompt: &str) -> Result<ChatResponse, WorkflowError> {
        let raw = self.post(chat_request_body(prompt)).await?;
        Ok(self.normalizer.normalize(&raw))
    }

    async fn generate_summary(&self) -> Result<String, WorkflowError> {
        let raw = self.post(summary_request_body()).await?;
        Ok(summarize_reply(&self.normalizer, &raw))
    }
}

/// Body for one chat turn.
fn chat_request_body(prompt: &str) -> Value {
    json!({
        "prompt": prompt,
        "response_json_schema": &*DEFAULT_RESPONSE_SCHEMA,
        "timestamp": Timestamp::now().to_rfc3339(),
    })
}

/// Body for the summary call: same transport, no prompt, no schema —
/// the workflow tracks its own history and prompts.
fn summary_request_body() -> Value {
    json!({
        "prompt": "",
        "timestamp": Timestamp::now().to_rfc3339(),
    })
}

/// Extracts the summary text from a summary-call reply.
///
/// The workflow returns a bare string or an object carrying `summary` or
/// `content`; failing those, the normalized message, then the serialized
/// payload.
fn summarize_reply(normalizer: &ResponseNormalizer, raw: &Value) -> String {
    let resolved = resolve_shape(raw);
    if let Value::String(text) = resolved {
        return text.trim().to_string();
    }
    for key in ["summary", "content"] {
        if let Some(text) = resolved
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            return text.to_string();
        }
    }
    let normalized = normalizer.normalize(raw);
    if normalized.has_message() {
        return normalized.next_message;
    }
    resolved.to_string()
}
