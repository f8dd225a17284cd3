//! # npcchat Core Library
//!
//! Service-agnostic conversation pipeline for a single NPC talking to many
//! players at once.
//!
//! Every player gets a [`PlayerSession`] holding the NPC's disposition toward
//! them and a short history of what they said:
//!
//! - **Mood** — Neutral / Friendly / Angry, driven by keyword rules
//! - **Context window** — the last three messages, oldest evicted first
//!
//! A batch of messages is ordered chronologically, then each message flows
//! through the [`Pipeline`]:
//!
//! ```text
//! batch ──► timestamp::normalize ──► stable sort
//!                                        │
//!        ┌───────────────────────────────┘
//!        ▼
//!   SessionStore ──► peek context ──► mood::update_mood
//!                                        │
//!                                        ▼
//!                     Responder (remote ─✗─► rule-based)
//!                                        │
//!                                        ▼
//!              append context ──► LogRecord ──► sinks
//! ```
//!
//! The remote generative strategy lives outside this crate; anything that
//! implements [`ReplyStrategy`] can be plugged into a [`Responder`].

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod context;
pub mod error;
pub mod message;
pub mod mood;
pub mod pipeline;
pub mod reply;
pub mod session;
pub mod sink;
pub mod timestamp;

pub use config::ChatConfig;
pub use context::ContextWindow;
pub use error::{ChatError, RemoteServiceFailure};
pub use message::{LogRecord, Message, PlayerId};
pub use mood::{Mood, MoodReason, MoodTransition};
pub use pipeline::{Pipeline, RunSummary};
pub use reply::{Reply, ReplyRequest, ReplySource, ReplyStrategy, Responder, RuleBased};
pub use session::{PlayerSession, SessionStore};
pub use sink::{JsonLinesSink, RecordSink};
