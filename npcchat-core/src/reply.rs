//! Reply strategies — how the NPC decides what to say.
//!
//! ## Strategies
//!
//! - **Remote generative:** implemented outside this crate on top of an LLM
//!   client. May fail for any reason (network, timeout, bad payload).
//! - **Rule-based ([`RuleBased`]):** fixed lines keyed on mood and a few
//!   keywords. Deterministic, never fails, never empty.
//!
//! A [`Responder`] tries the optional primary strategy once and answers with
//! the rule-based line when it fails. The returned [`ReplySource`] always
//! names the strategy whose text is returned.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::error::RemoteServiceFailure;
use crate::mood::{Mood, contains_any};

/// Keywords that make the rule-based fallback give directions.
pub const DIRECTION_KEYWORDS: &[&str] = &["where", "go", "quest"];

/// Source tag recorded for rule-based replies.
pub const FALLBACK_TAG: &str = "fallback";

// ---------------------------------------------------------------------------
// Request / Reply
// ---------------------------------------------------------------------------

/// Everything a strategy gets to see when producing one reply.
#[derive(Debug, Clone, Copy)]
pub struct ReplyRequest<'a> {
    /// Display name of the NPC.
    pub npc_name: &'a str,
    /// Mood after the current message was taken into account.
    pub mood: Mood,
    /// Player's previous messages, oldest first. Excludes `text`.
    pub context: &'a [String],
    /// The message being answered.
    pub text: &'a str,
}

/// Provenance of a reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReplySource {
    /// Produced by a remote model, tagged `provider:model`.
    Remote {
        /// Service family, e.g. `openai`.
        provider: String,
        /// Model identifier passed to the service.
        model: String,
    },
    /// Produced by the rule-based fallback.
    Fallback,
}

impl ReplySource {
    /// Tag for a remote reply.
    pub fn remote(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self::Remote {
            provider: provider.into(),
            model: model.into(),
        }
    }

    /// Whether the fallback produced the reply.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }
}

impl fmt::Display for ReplySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote { provider, model } => write!(f, "{provider}:{model}"),
            Self::Fallback => f.write_str(FALLBACK_TAG),
        }
    }
}

impl FromStr for ReplySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == FALLBACK_TAG {
            return Ok(Self::Fallback);
        }
        match s.split_once(':') {
            Some((provider, model)) if !provider.is_empty() && !model.is_empty() => {
                Ok(Self::remote(provider, model))
            }
            _ => Err(format!("unrecognized reply source tag: {s:?}")),
        }
    }
}

// Serialized as the flat tag string so log lines stay greppable.
impl Serialize for ReplySource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReplySource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}

/// A reply plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// What the NPC says.
    pub text: String,
    /// Which strategy said it.
    pub source: ReplySource,
}

// ---------------------------------------------------------------------------
// Strategy trait
// ---------------------------------------------------------------------------

/// Capability to produce an NPC reply for one message.
pub trait ReplyStrategy {
    /// Produce a reply, or fail with [`RemoteServiceFailure`].
    ///
    /// Implementations must not retry; the caller decides what happens next.
    fn generate(
        &self,
        request: &ReplyRequest<'_>,
    ) -> impl Future<Output = Result<Reply, RemoteServiceFailure>>;
}

// ---------------------------------------------------------------------------
// Rule-based fallback
// ---------------------------------------------------------------------------

/// Deterministic keyword/mood replies. Always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBased;

impl RuleBased {
    /// Pick the fixed line for this mood and text.
    #[must_use]
    pub fn line(mood: Mood, text: &str) -> &'static str {
        let lowered = text.to_lowercase();
        let asks_directions = contains_any(&lowered, DIRECTION_KEYWORDS);

        match mood {
            Mood::Angry => {
                if lowered.contains("sorry") {
                    "Fine. Head east to the mill."
                } else {
                    "Make it quick. East road leads to the mill."
                }
            }
            Mood::Friendly => {
                if asks_directions {
                    "Follow the east road to the mill. The elder can help you!"
                } else {
                    "How can I help you today?"
                }
            }
            Mood::Neutral => {
                if asks_directions {
                    "East road goes to the mill. Village center is by the well."
                } else {
                    "What do you need? I can offer directions or information."
                }
            }
        }
    }

    /// Infallible reply for a request.
    #[must_use]
    pub fn answer(&self, request: &ReplyRequest<'_>) -> Reply {
        Reply {
            text: Self::line(request.mood, request.text).to_string(),
            source: ReplySource::Fallback,
        }
    }
}

impl ReplyStrategy for RuleBased {
    async fn generate(&self, request: &ReplyRequest<'_>) -> Result<Reply, RemoteServiceFailure> {
        Ok(self.answer(request))
    }
}

// ---------------------------------------------------------------------------
// Responder — primary with fallback
// ---------------------------------------------------------------------------

/// Tries an optional primary strategy, falls back to [`RuleBased`].
///
/// Whether a primary exists is decided once at startup (e.g. credentials
/// present or not) and never changes during a run.
#[derive(Debug)]
pub struct Responder<S> {
    primary: Option<S>,
    fallback: RuleBased,
}

impl Responder<RuleBased> {
    /// A responder with no primary strategy: every reply is rule-based.
    #[must_use]
    pub fn rule_based_only() -> Self {
        Self {
            primary: None,
            fallback: RuleBased,
        }
    }
}

impl<S: ReplyStrategy> Responder<S> {
    /// Build a responder around an optional primary strategy.
    pub fn new(primary: Option<S>) -> Self {
        Self {
            primary,
            fallback: RuleBased,
        }
    }

    /// Whether a primary strategy is configured.
    #[must_use]
    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// Produce a reply. Never fails.
    pub async fn reply(&self, request: &ReplyRequest<'_>) -> Reply {
        if let Some(primary) = &self.primary {
            match primary.generate(request).await {
                Ok(reply) => return reply,
                Err(e) => warn!(error = %e, "primary reply strategy failed, using rule-based fallback"),
            }
        }
        self.fallback.answer(request)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn request<'a>(mood: Mood, context: &'a [String], text: &'a str) -> ReplyRequest<'a> {
        ReplyRequest {
            npc_name: "Elya the Ranger",
            mood,
            context,
            text,
        }
    }

    /// Scripted primary strategy that counts its calls.
    struct Scripted {
        outcome: Result<Reply, RemoteServiceFailure>,
        calls: Cell<u32>,
    }

    impl Scripted {
        fn new(outcome: Result<Reply, RemoteServiceFailure>) -> Self {
            Self {
                outcome,
                calls: Cell::new(0),
            }
        }
    }

    impl ReplyStrategy for Scripted {
        async fn generate(&self, _request: &ReplyRequest<'_>) -> Result<Reply, RemoteServiceFailure> {
            self.calls.set(self.calls.get() + 1);
            self.outcome.clone()
        }
    }

    #[test]
    fn rule_lines_cover_every_branch() {
        let cases = [
            (Mood::Angry, "I'm sorry", "Fine. Head east to the mill."),
            (Mood::Angry, "whatever", "Make it quick. East road leads to the mill."),
            (Mood::Friendly, "Where is the mill?", "Follow the east road to the mill. The elder can help you!"),
            (Mood::Friendly, "hello", "How can I help you today?"),
            (Mood::Neutral, "Any QUEST for me", "East road goes to the mill. Village center is by the well."),
            (Mood::Neutral, "hello", "What do you need? I can offer directions or information."),
        ];
        for (mood, text, expected) in cases {
            assert_eq!(RuleBased::line(mood, text), expected, "mood={mood} text={text:?}");
        }
    }

    #[test]
    fn rule_based_tags_fallback() {
        let reply = RuleBased.answer(&request(Mood::Neutral, &[], "hi"));
        assert_eq!(reply.source, ReplySource::Fallback);
        assert_eq!(reply.source.to_string(), "fallback");
    }

    #[tokio::test]
    async fn primary_success_is_returned_with_its_tag() {
        let primary = Scripted::new(Ok(Reply {
            text: "The mill lies east, traveler.".into(),
            source: ReplySource::remote("openai", "gpt-3.5-turbo"),
        }));
        let responder = Responder::new(Some(primary));
        let reply = responder.reply(&request(Mood::Friendly, &[], "where is the mill?")).await;
        assert_eq!(reply.text, "The mill lies east, traveler.");
        assert_eq!(reply.source.to_string(), "openai:gpt-3.5-turbo");
    }

    #[tokio::test]
    async fn primary_failure_falls_back_without_retry() {
        let responder = Responder::new(Some(Scripted::new(Err(RemoteServiceFailure::new(
            "connection refused",
        )))));
        let reply = responder.reply(&request(Mood::Angry, &[], "sorry")).await;
        assert_eq!(reply.text, "Fine. Head east to the mill.");
        assert!(reply.source.is_fallback());
        assert!(!reply.text.contains("connection refused"));
        assert_eq!(responder.primary.as_ref().map(|p| p.calls.get()), Some(1));
    }

    #[tokio::test]
    async fn rule_based_only_never_calls_out() {
        let responder = Responder::rule_based_only();
        assert!(!responder.has_primary());
        let reply = responder.reply(&request(Mood::Neutral, &[], "hello")).await;
        assert!(reply.source.is_fallback());
    }

    #[test]
    fn source_tags_parse_back() {
        assert_eq!("fallback".parse::<ReplySource>().unwrap(), ReplySource::Fallback);
        assert_eq!(
            "openai:llama3:8b".parse::<ReplySource>().unwrap(),
            ReplySource::remote("openai", "llama3:8b")
        );
        assert!("gpt".parse::<ReplySource>().is_err());
    }
}
