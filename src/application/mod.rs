//! Application layer: the conversation orchestrator.

mod engine;

pub use engine::{ConversationEngine, EngineError, SessionSnapshot};
