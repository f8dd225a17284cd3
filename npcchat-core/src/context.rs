//! Per-player context window — the last few things a player said.

use std::collections::VecDeque;

/// How many past messages each player's window keeps.
pub const CONTEXT_CAPACITY: usize = 3;

/// Bounded, ordered history of a player's recent message texts.
///
/// Oldest entries are evicted first. The pipeline reads the window with
/// [`peek`](Self::peek) *before* appending the message being answered, so a
/// reply's context never contains the message itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextWindow {
    entries: VecDeque<String>,
}

impl ContextWindow {
    /// Create an empty window.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(CONTEXT_CAPACITY + 1),
        }
    }

    /// Snapshot of the window, most recent last.
    #[must_use]
    pub fn peek(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    /// Record a new message, evicting from the front past capacity.
    pub fn append(&mut self, text: impl Into<String>) {
        self.entries.push_back(text.into());
        while self.entries.len() > CONTEXT_CAPACITY {
            self.entries.pop_front();
        }
    }

    /// Number of messages currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no message has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let window = ContextWindow::new();
        assert!(window.is_empty());
        assert!(window.peek().is_empty());
    }

    #[test]
    fn keeps_insertion_order_below_capacity() {
        let mut window = ContextWindow::new();
        window.append("a");
        window.append("b");
        assert_eq!(window.peek(), vec!["a", "b"]);
    }

    #[test]
    fn evicts_oldest_past_capacity() {
        let mut window = ContextWindow::new();
        for text in ["one", "two", "three", "four", "five"] {
            window.append(text);
        }
        assert_eq!(window.len(), CONTEXT_CAPACITY);
        assert_eq!(window.peek(), vec!["three", "four", "five"]);
    }

    #[test]
    fn peek_is_a_snapshot() {
        let mut window = ContextWindow::new();
        window.append("first");
        let before = window.peek();
        window.append("second");
        assert_eq!(before, vec!["first"]);
        assert_eq!(window.peek(), vec!["first", "second"]);
    }
}
