//! Pipeline orchestrator — drives a whole batch through the NPC.
//!
//! Order of operations per message matters and is observable in the output:
//!
//! 1. fetch or create the player's session
//! 2. snapshot the context window (before this message is appended)
//! 3. update the mood from the *current* mood and the message text
//! 4. reply using the *updated* mood and the snapshot
//! 5. append the message to the context window
//! 6. emit the log record to every sink, in sink order
//!
//! Processing is strictly sequential in global timestamp order, across all
//! players.

use tracing::{debug, info};

use crate::error::Result;
use crate::message::{LogRecord, Message};
use crate::mood;
use crate::reply::{ReplyRequest, ReplyStrategy, Responder};
use crate::session::SessionStore;
use crate::sink::RecordSink;
use crate::timestamp;

/// Counters for one processed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Messages processed (= records emitted per sink).
    pub messages: usize,
    /// Distinct players seen.
    pub players: usize,
    /// Replies produced by the primary (remote) strategy.
    pub remote_replies: usize,
    /// Replies produced by the rule-based fallback.
    pub fallback_replies: usize,
}

/// Parse every timestamp, then stable-sort the batch chronologically.
///
/// Messages with equal instants keep their input order.
///
/// # Errors
/// Returns [`ChatError::MalformedTimestamp`](crate::ChatError::MalformedTimestamp)
/// for the first timestamp that does not parse; nothing is returned in that
/// case.
pub fn order_batch(batch: Vec<Message>) -> Result<Vec<Message>> {
    let mut keyed = batch
        .into_iter()
        .map(|message| Ok((timestamp::normalize(&message.timestamp)?, message)))
        .collect::<Result<Vec<_>>>()?;

    // `sort_by_key` is stable.
    keyed.sort_by_key(|(instant, _)| *instant);

    Ok(keyed.into_iter().map(|(_, message)| message).collect())
}

/// Stateful message processor for one NPC.
#[derive(Debug)]
pub struct Pipeline<S> {
    npc_name: String,
    responder: Responder<S>,
    sessions: SessionStore,
}

impl<S: ReplyStrategy> Pipeline<S> {
    /// Create a pipeline with no sessions yet.
    pub fn new(npc_name: impl Into<String>, responder: Responder<S>) -> Self {
        Self {
            npc_name: npc_name.into(),
            responder,
            sessions: SessionStore::new(),
        }
    }

    /// The NPC's display name.
    #[must_use]
    pub fn npc_name(&self) -> &str {
        &self.npc_name
    }

    /// Sessions accumulated so far.
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Process a single message against current state.
    ///
    /// Callers are responsible for feeding messages in chronological order;
    /// [`run`](Self::run) does that for a whole batch.
    pub async fn process(&mut self, message: &Message) -> LogRecord {
        let session = self.sessions.get_or_create(&message.player_id);
        let context_used = session.context.peek();
        let transition = mood::update_mood(session.mood, &message.text);
        session.mood = transition.mood;

        let request = ReplyRequest {
            npc_name: &self.npc_name,
            mood: transition.mood,
            context: &context_used,
            text: &message.text,
        };
        let reply = self.responder.reply(&request).await;

        self.sessions
            .get_or_create(&message.player_id)
            .context
            .append(message.text.clone());

        debug!(
            player = %message.player_id,
            mood = %transition.mood,
            reason = %transition.reason,
            source = %reply.source,
            context_len = context_used.len(),
            "processed message"
        );

        LogRecord {
            player_id: message.player_id.clone(),
            timestamp: message.timestamp.clone(),
            message_text: message.text.clone(),
            npc_reply: reply.text,
            context_used,
            npc_mood: transition.mood,
            mood_reason: transition.reason,
            reply_source: reply.source,
            npc_name: self.npc_name.clone(),
        }
    }

    /// Order and process a whole batch, emitting each record to every sink.
    ///
    /// # Errors
    /// - [`ChatError::MalformedTimestamp`](crate::ChatError::MalformedTimestamp)
    ///   before anything is emitted.
    /// - [`ChatError::SinkWrite`](crate::ChatError::SinkWrite) as soon as any
    ///   sink fails; records already emitted are not retracted.
    pub async fn run(
        &mut self,
        batch: Vec<Message>,
        sinks: &mut [&mut dyn RecordSink],
    ) -> Result<RunSummary> {
        let ordered = order_batch(batch)?;
        self.run_ordered(ordered, sinks).await
    }

    /// Process a batch already returned by [`order_batch`], as given.
    ///
    /// For callers that must validate timestamps before acquiring sinks.
    ///
    /// # Errors
    /// [`ChatError::SinkWrite`](crate::ChatError::SinkWrite) as soon as any
    /// sink fails.
    pub async fn run_ordered(
        &mut self,
        ordered: Vec<Message>,
        sinks: &mut [&mut dyn RecordSink],
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for message in &ordered {
            let record = self.process(message).await;
            for sink in sinks.iter_mut() {
                sink.emit(&record)?;
            }

            summary.messages += 1;
            if record.reply_source.is_fallback() {
                summary.fallback_replies += 1;
            } else {
                summary.remote_replies += 1;
            }
        }

        for sink in sinks.iter_mut() {
            sink.flush()?;
        }

        summary.players = self.sessions.len();
        info!(
            messages = summary.messages,
            players = summary.players,
            remote = summary.remote_replies,
            fallback = summary.fallback_replies,
            "batch complete"
        );
        Ok(summary)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
