//! Per-player conversation state.

use std::collections::HashMap;

use crate::context::ContextWindow;
use crate::message::PlayerId;
use crate::mood::Mood;

/// What the NPC holds about one player for the length of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerSession {
    /// Current disposition toward this player.
    pub mood: Mood,
    /// This player's recent messages.
    pub context: ContextWindow,
}

/// All sessions seen so far, created lazily on first message.
///
/// Sessions are never evicted; the store lives as long as the pipeline.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<PlayerId, PlayerSession>,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session for `player`, inserting a fresh Neutral one if unseen.
    pub fn get_or_create(&mut self, player: &PlayerId) -> &mut PlayerSession {
        self.sessions.entry(player.clone()).or_default()
    }

    /// Session for `player`, if it exists.
    #[must_use]
    pub fn get(&self, player: &PlayerId) -> Option<&PlayerSession> {
        self.sessions.get(player)
    }

    /// Number of distinct players seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no player has been seen yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
