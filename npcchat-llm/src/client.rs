//! LLM Client — single-attempt chat completions against OpenAI-compatible APIs.

use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::types::{ChatRequest, ChatResponse};

/// Provider backend for chat completions.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    /// OpenAI or any API speaking the same `/v1/chat/completions` protocol.
    OpenAiCompatible { base_url: String, api_key: String },
    /// No LLM available — all calls return error, triggering rule-based fallback.
    None,
}

/// The client that sends chat requests to the configured backend.
#[derive(Debug, Clone)]
pub struct LlmClient {
    provider: LlmProvider,
    http: Client,
}

impl LlmClient {
    /// Create a new LLM client.
    #[must_use]
    pub fn new(provider: LlmProvider) -> Self {
        Self {
            provider,
            http: Client::new(),
        }
    }

    /// Client for an OpenAI-compatible endpoint.
    #[must_use]
    pub fn openai(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::new(LlmProvider::OpenAiCompatible {
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Create a client with no LLM backend (all calls fail → rule-based fallback).
    #[must_use]
    pub fn none() -> Self {
        Self::new(LlmProvider::None)
    }

    /// Short provider name used in reply source tags.
    #[must_use]
    pub fn provider_tag(&self) -> &'static str {
        match self.provider {
            LlmProvider::OpenAiCompatible { .. } => "openai",
            LlmProvider::None => "none",
        }
    }

    /// Check if the LLM client has a backend configured.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self.provider, LlmProvider::None)
    }

    /// Run one chat completion.
    ///
    /// Exactly one attempt is made, bounded by `request.timeout_ms`. The
    /// caller should fall back to rule-based generation on error.
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        match &self.provider {
            LlmProvider::None => Err(LlmError::Unavailable("No LLM provider configured".into())),
            LlmProvider::OpenAiCompatible { base_url, api_key } => {
                let timeout = Duration::from_millis(request.timeout_ms);
                tokio::time::timeout(timeout, self.complete_openai(base_url, api_key, request))
                    .await
                    .map_err(|_| {
                        warn!("OpenAI API request timed out after {}ms", request.timeout_ms);
                        LlmError::Timeout(request.timeout_ms)
                    })?
            }
        }
    }

    async fn complete_openai(
        &self,
        base_url: &str,
        api_key: &str,
        request: &ChatRequest,
    ) -> Result<ChatResponse, LlmError> {
        let url = completions_url(base_url);
        debug!(%url, model = %request.model, turns = request.turns.len(), "sending chat completion");

        let start = Instant::now();
        let resp = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&request.to_openai_body())
            .send()
            .await
            .inspect_err(|e| warn!("OpenAI API request failed: {e}"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            warn!("OpenAI API returned error: HTTP {status}");
            return Err(LlmError::Http { status });
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))?;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let text = extract_reply(&json)?;
        let tokens = json["usage"]["completion_tokens"].as_u64().unwrap_or(0);

        Ok(ChatResponse {
            text,
            tokens_generated: u32::try_from(tokens).unwrap_or(u32::MAX),
            latency_ms,
        })
    }
}

/// Build the completions URL, accepting base URLs with or without `/v1`.
fn completions_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with("/v1") {
        format!("{base}/chat/completions")
    } else {
        format!("{base}/v1/chat/completions")
    }
}

/// Pull the reply text out of an OpenAI chat-completion body.
///
/// # Errors
/// `ParseError` if `choices[0].message.content` is missing or not a string,
/// `EmptyResponse` if it is blank.
pub fn extract_reply(json: &serde_json::Value) -> Result<String, LlmError> {
    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| LlmError::ParseError("missing choices[0].message.content".into()))?;

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatTurn;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accepts connections and never answers them.
    async fn silent_endpoint() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{addr}")
    }

    /// Answers exactly one request with `200 OK` and `body`.
    async fn canned_endpoint(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request_complete(&request) {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}")
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(head_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..head_end]
            .lines()
            .find_map(|line| {
                line.to_ascii_lowercase()
                    .strip_prefix("content-length:")
                    .map(|v| v.trim().parse::<usize>().unwrap_or(0))
            })
            .unwrap_or(0);
        raw.len() >= head_end + 4 + length
    }

    #[test]
    fn url_accepts_both_base_shapes() {
        assert_eq!(
            completions_url("https://api.openai.com"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            completions_url("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn extracts_and_trims_content() {
        let body = json!({
            "choices": [{ "message": { "role": "assistant", "content": "  Head east.\n" } }]
        });
        assert_eq!(extract_reply(&body).unwrap(), "Head east.");
    }

    #[test]
    fn missing_content_is_parse_error() {
        assert!(matches!(extract_reply(&json!({"choices": []})), Err(LlmError::ParseError(_))));
        assert!(matches!(extract_reply(&json!({"error": "bad"})), Err(LlmError::ParseError(_))));
    }

    #[test]
    fn blank_content_is_empty_response() {
        let body = json!({ "choices": [{ "message": { "content": "   " } }] });
        assert!(matches!(extract_reply(&body), Err(LlmError::EmptyResponse)));
    }

    #[tokio::test]
    async fn none_provider_is_unavailable() {
        let client = LlmClient::none();
        assert!(!client.is_available());
        let request = ChatRequest::new("gpt-3.5-turbo", vec![ChatTurn::user("hi")]);
        assert!(matches!(client.complete(&request).await, Err(LlmError::Unavailable(_))));
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_without_panicking() {
        // Port 9 (discard) on loopback is closed on any sane test machine.
        let client = LlmClient::openai("http://127.0.0.1:9", "sk-test");
        assert_eq!(client.provider_tag(), "openai");
        let request = ChatRequest::new("gpt-3.5-turbo", vec![ChatTurn::user("hi")]).with_timeout(2_000);
        assert!(client.complete(&request).await.is_err());
    }

    #[tokio::test]
    async fn silent_endpoint_times_out() {
        let client = LlmClient::openai(silent_endpoint().await, "sk-test");
        let request = ChatRequest::new("gpt-3.5-turbo", vec![ChatTurn::user("hi")]).with_timeout(300);

        let started = Instant::now();
        let result = client.complete(&request).await;
        assert!(matches!(result, Err(LlmError::Timeout(300))), "got {result:?}");
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn successful_completion_reports_text_and_usage() {
        let base = canned_endpoint(
            r#"{"model":"gpt-3.5-turbo","choices":[{"message":{"role":"assistant","content":" Head east. "}}],"usage":{"completion_tokens":4}}"#,
        )
        .await;
        let client = LlmClient::openai(base, "sk-test");
        let request = ChatRequest::new("gpt-3.5-turbo", vec![ChatTurn::user("hi")]).with_timeout(5_000);

        let response = client.complete(&request).await.unwrap();
        assert_eq!(response.text, "Head east.");
        assert_eq!(response.tokens_generated, 4);
    }
}
