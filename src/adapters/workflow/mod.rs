//! Chat workflow adapters: webhook client, reply normalizer, test mock.

mod http_client;
mod mock;
mod normalizer;

pub use http_client::{HttpChatWorkflow, WorkflowClientConfig};
pub use mock::{MockChatWorkflow, ScriptedReply};
pub use normalizer::{default_reasoning_fallback, ReasoningFallback, ResponseNormalizer};
