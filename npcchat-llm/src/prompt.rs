//! Prompt templates for NPC replies.
//!
//! A reply request is always the same three-part conversation:
//!
//! 1. a system turn with the persona, current mood and tone guidance
//! 2. if the player said anything before, one user turn listing it
//! 3. the player's current message

use crate::types::ChatTurn;

/// Persona instructions for every reply.
pub const NPC_SYSTEM: &str = r"You are {npc_name}, a game NPC. Current mood: {mood}.
Keep replies short (1-2 sentences). Be helpful if friendly, concise if neutral, curt if angry.";

/// Header of the turn summarizing earlier player messages.
pub const CONTEXT_HEADER: &str = "Previous messages:";

/// Simple template interpolation for prompts.
///
/// Replaces `{key}` with the corresponding value.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

/// Bullet list of earlier messages, or `None` when there are none.
#[must_use]
pub fn format_context(history: &[String]) -> Option<String> {
    if history.is_empty() {
        return None;
    }
    let bullets: Vec<String> = history.iter().map(|m| format!("- {m}")).collect();
    Some(format!("{CONTEXT_HEADER}\n{}", bullets.join("\n")))
}

/// Build the ordered turns for one NPC reply.
///
/// `mood` is the lowercase mood name the NPC should speak in.
#[must_use]
pub fn build_turns(npc_name: &str, mood: &str, history: &[String], current_text: &str) -> Vec<ChatTurn> {
    let system = render_template(NPC_SYSTEM, &[("npc_name", npc_name), ("mood", mood)]);

    let mut turns = vec![ChatTurn::system(system)];
    if let Some(context) = format_context(history) {
        turns.push(ChatTurn::user(context));
    }
    turns.push(ChatTurn::user(current_text));
    turns
}
