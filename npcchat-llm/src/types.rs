//! Core types for chat-completion requests and responses.

use serde::{Deserialize, Serialize};

/// Who is speaking in a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions framing the whole conversation.
    System,
    /// The player side (or summarized player context).
    User,
}

/// One role-tagged turn, serialized exactly as the OpenAI wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// A chat-completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier passed through to the service.
    pub model: String,
    /// Ordered conversation turns.
    pub turns: Vec<ChatTurn>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Temperature (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl ChatRequest {
    /// Create a request with the NPC reply defaults: 60 tokens, temperature
    /// 0.7, 10 second timeout.
    #[must_use]
    pub fn new(model: impl Into<String>, turns: Vec<ChatTurn>) -> Self {
        Self {
            model: model.into(),
            turns,
            max_tokens: 60,
            temperature: 0.7,
            timeout_ms: 10_000,
        }
    }

    /// Set the token limit.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// JSON body for `POST /v1/chat/completions`.
    #[must_use]
    pub fn to_openai_body(&self) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": self.turns,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        })
    }
}

/// A successful chat-completion response.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// The generated text, trimmed.
    pub text: String,
    /// Completion tokens reported by the service, 0 if absent.
    pub tokens_generated: u32,
    /// Wall time of the request in milliseconds.
    pub latency_ms: u64,
}
