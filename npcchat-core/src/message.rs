//! Wire types: the input message batch and the per-message log record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChatError, Result};
use crate::mood::{Mood, MoodReason};
use crate::reply::ReplySource;

/// Opaque player identifier — whatever the client sent, integer or string.
///
/// Serialized back in the same JSON shape it arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayerId {
    /// Numeric id, e.g. `42` or `-1`.
    Number(i64),
    /// Numeric id past `i64::MAX`. Only reached when `Number` can't hold it.
    Unsigned(u64),
    /// String id, e.g. `"p-7"`.
    Text(String),
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Unsigned(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for PlayerId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// One chat line from a player to the NPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent it.
    pub player_id: PlayerId,
    /// What they said.
    pub text: String,
    /// When, as an ISO-8601 string. Parsed only for ordering.
    pub timestamp: String,
}

impl Message {
    /// Convenience constructor.
    pub fn new(
        player_id: impl Into<PlayerId>,
        text: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            text: text.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Parse a JSON array of messages.
///
/// # Errors
/// Returns [`ChatError::MalformedInput`] on invalid JSON, a non-array
/// document, or any message missing a required field.
pub fn parse_batch(json: &str) -> Result<Vec<Message>> {
    serde_json::from_str(json).map_err(|e| ChatError::MalformedInput(e.to_string()))
}

/// Structured record emitted once per processed message.
///
/// Field order is the order written to the JSON line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Sender of the message.
    pub player_id: PlayerId,
    /// Original, unnormalized timestamp string.
    pub timestamp: String,
    /// The message as sent.
    pub message_text: String,
    /// What the NPC answered.
    pub npc_reply: String,
    /// Player's context window before this message was appended.
    pub context_used: Vec<String>,
    /// Mood after processing this message.
    pub npc_mood: Mood,
    /// Rule that produced `npc_mood`.
    pub mood_reason: MoodReason,
    /// Which strategy produced `npc_reply`.
    pub reply_source: ReplySource,
    /// Display name of the NPC.
    pub npc_name: String,
}
