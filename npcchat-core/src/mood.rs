//! Mood engine — the NPC's disposition toward one player.
//!
//! Pure keyword rules over the lowercased message text. Precedence, first
//! match wins:
//!
//! 1. insult                         → Angry    (`insult_detected`)
//! 2. Angry and apologetic           → Neutral  (`deescalated`)
//! 3. help request or ends with `?`  → Friendly (`help_or_question`)
//! 4. anything else                  → unchanged (`no_change`)
//!
//! Rule 2 sits ahead of rule 3, unlike a plain "insult, help, apology" list.
//! `please` is both a help and an apology keyword, so with help first an
//! angry NPC could never be calmed by "Sorry, please help". The order only
//! matters when the NPC is already angry and the text carries both kinds of
//! keyword: Angry + "thanks, where is the mill?" yields Neutral
//! (`deescalated`), not Friendly.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Substrings that always make the NPC angry.
pub const INSULT_KEYWORDS: &[&str] = &["stupid", "idiot", "useless", "dumb", "hate", "shut up"];

/// Substrings that read as a request for help.
pub const HELP_KEYWORDS: &[&str] = &["help", "where", "how", "quest", "please", "assist", "lost"];

/// Substrings that calm an angry NPC down.
pub const DEESCALATION_KEYWORDS: &[&str] = &["sorry", "please", "thanks"];

/// The NPC's emotional disposition toward a single player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Starting disposition for every player.
    #[default]
    Neutral,
    /// Player asked for help or a question.
    Friendly,
    /// Player insulted the NPC.
    Angry,
}

impl Mood {
    /// Lowercase name, as written to logs and prompts.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Friendly => "friendly",
            Self::Angry => "angry",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule produced a mood transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodReason {
    /// An insult keyword was present.
    InsultDetected,
    /// A help keyword was present or the text ended with `?`.
    HelpOrQuestion,
    /// The NPC was angry and the player apologized.
    Deescalated,
    /// No rule matched; mood carried over.
    NoChange,
}

impl MoodReason {
    /// Snake-case name, as written to logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InsultDetected => "insult_detected",
            Self::HelpOrQuestion => "help_or_question",
            Self::Deescalated => "deescalated",
            Self::NoChange => "no_change",
        }
    }
}

impl fmt::Display for MoodReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of feeding one message through the mood engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodTransition {
    /// Mood after this message.
    pub mood: Mood,
    /// Rule that fired.
    pub reason: MoodReason,
}

impl MoodTransition {
    fn new(mood: Mood, reason: MoodReason) -> Self {
        Self { mood, reason }
    }
}

/// Whether `lowered` contains any of `keywords`.
///
/// `lowered` must already be lowercase; keyword lists are lowercase.
pub(crate) fn contains_any(lowered: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| lowered.contains(k))
}

/// Compute the NPC's next mood toward a player from the message they sent.
#[must_use]
pub fn update_mood(current: Mood, text: &str) -> MoodTransition {
    let lowered = text.to_lowercase();

    if contains_any(&lowered, INSULT_KEYWORDS) {
        return MoodTransition::new(Mood::Angry, MoodReason::InsultDetected);
    }

    if current == Mood::Angry && contains_any(&lowered, DEESCALATION_KEYWORDS) {
        return MoodTransition::new(Mood::Neutral, MoodReason::Deescalated);
    }

    if contains_any(&lowered, HELP_KEYWORDS) || lowered.ends_with('?') {
        return MoodTransition::new(Mood::Friendly, MoodReason::HelpOrQuestion);
    }

    MoodTransition::new(current, MoodReason::NoChange)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
