//! # npcchat-llm — Chat-Completion Client for npcchat
//!
//! Talks to an OpenAI-compatible `/v1/chat/completions` endpoint on behalf
//! of the NPC. Every call is a single attempt bounded by a timeout; any
//! failure is reported as an [`LlmError`] and the caller falls back to its
//! rule-based replies.
//!
//! # Architecture
//!
//! ```text
//! prompt::build_turns ──► ChatRequest ──► LlmClient::complete ──► ChatResponse
//!                                               │
//!                                               └─✗─► LlmError (caller falls back)
//! ```

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::{LlmClient, LlmProvider};
pub use error::LlmError;
pub use types::{ChatRequest, ChatResponse, ChatRole, ChatTurn};
