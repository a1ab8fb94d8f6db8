//! Civis - Conversational Citizen Feedback Collection
//!
//! This crate implements the conversation-orchestration engine behind a
//! multi-turn feedback-collection dialogue driven by an external AI
//! workflow: wire-shape normalization, incremental ticket accumulation,
//! a deterministic session protocol, and best-effort report dispatch.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
