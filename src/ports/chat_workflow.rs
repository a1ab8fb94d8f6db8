//! Chat workflow port - interface to the external AI workflow.
//!
//! The workflow is an external webhook that owns the conversational
//! memory and the prompting; the engine only sends the latest user
//! message and receives one reply per turn. Reply shapes vary wildly,
//! so implementations normalize them into the canonical [`ChatResponse`]
//! before handing them back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::ticket::TicketFragment;

/// Port for the conversational AI workflow.
#[async_trait]
pub trait ChatWorkflow: Send + Sync {
    /// Runs one dialogue turn: sends the prompt, returns the normalized
    /// reply.
    ///
    /// An empty-but-valid reply is not an error; it comes back as a
    /// low-confidence empty [`ChatResponse`]. Transport failures and
    /// undecodable bodies are hard errors.
    async fn invoke(&self, prompt: &str) -> Result<ChatResponse, WorkflowError>;

    /// Asks the workflow for a summary of the conversation so far.
    ///
    /// The workflow tracks its own history, so no prompt is sent.
    async fn generate_summary(&self) -> Result<String, WorkflowError>;
}

/// Canonical form of one workflow reply.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Display text for the next bot turn. May be empty, or the
    /// reserved confirmation sentinel (a protocol signal, never shown).
    pub next_message: String,
    /// Partial ticket data extracted this turn.
    pub ticket: TicketFragment,
    /// Workflow's confidence in the extraction.
    pub confidence: Confidence,
}

impl ChatResponse {
    /// True iff the reply carries display text.
    pub fn has_message(&self) -> bool {
        !self.next_message.trim().is_empty()
    }

    /// The "nothing useful happened" reply: empty message, empty
    /// fragment, low confidence. The caller decides what to do with it.
    pub fn empty_low_confidence() -> Self {
        Self {
            next_message: String::new(),
            ticket: TicketFragment::default(),
            confidence: Confidence::Low,
        }
    }
}

/// Workflow confidence in the extracted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    #[default]
    Medium,
    High,
}

impl Confidence {
    /// Lenient parse; anything unrecognized is `Medium`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }
}

/// Errors from the workflow transport.
///
/// Normalization failure is deliberately not here: a reply that decodes
/// to valid JSON but carries nothing usable is a soft outcome
/// ([`ChatResponse::empty_low_confidence`]), never an error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WorkflowError {
    /// Could not reach the workflow at all.
    #[error("network error calling workflow: {0}")]
    Network(String),

    /// The workflow answered with a non-success status.
    #[error("workflow returned status {status}: {body}")]
    Transport {
        /// HTTP status code.
        status: u16,
        /// Raw response body, for the log.
        body: String,
    },

    /// The reply body was empty or not parseable as JSON.
    #[error("workflow reply not decodable: {reason}")]
    Decode {
        /// What went wrong during decoding.
        reason: String,
        /// Leading slice of the raw body, for the log.
        body: String,
    },
}

impl WorkflowError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a transport error from a status and body.
    pub fn transport(status: u16, body: impl Into<String>) -> Self {
        Self::Transport {
            status,
            body: body.into(),
        }
    }

    /// Creates a decode error, keeping a bounded slice of the body.
    pub fn decode(reason: impl Into<String>, body: &str) -> Self {
        Self::Decode {
            reason: reason.into(),
            body: body.chars().take(200).collect(),
        }
    }
}
