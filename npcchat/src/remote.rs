//! Remote generative reply strategy backed by `npcchat-llm`.

use npcchat_core::config::LlmConfig;
use npcchat_core::{RemoteServiceFailure, Reply, ReplyRequest, ReplySource, ReplyStrategy};
use npcchat_llm::{ChatRequest, LlmClient, prompt};
use tracing::debug;

/// Asks a chat model for the NPC's reply. One attempt per message.
#[derive(Debug, Clone)]
pub struct RemoteGenerative {
    client: LlmClient,
    model: String,
    max_tokens: u32,
    temperature: f32,
    timeout_ms: u64,
}

impl RemoteGenerative {
    /// Wrap a client using the model and sampling settings from `config`.
    #[must_use]
    pub fn new(client: LlmClient, config: &LlmConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout_ms: config.timeout_ms,
        }
    }

    /// Chat request for one reply.
    #[must_use]
    pub fn build_request(&self, request: &ReplyRequest<'_>) -> ChatRequest {
        let turns = prompt::build_turns(
            request.npc_name,
            request.mood.as_str(),
            request.context,
            request.text,
        );
        ChatRequest::new(self.model.clone(), turns)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
            .with_timeout(self.timeout_ms)
    }
}

impl ReplyStrategy for RemoteGenerative {
    async fn generate(&self, request: &ReplyRequest<'_>) -> Result<Reply, RemoteServiceFailure> {
        let chat = self.build_request(request);
        let response = self
            .client
            .complete(&chat)
            .await
            .map_err(|e| RemoteServiceFailure::new(e.to_string()))?;
        debug!(
            model = %self.model,
            latency_ms = response.latency_ms,
            tokens = response.tokens_generated,
            "remote reply received"
        );

        Ok(Reply {
            text: response.text,
            source: ReplySource::remote(self.client.provider_tag(), self.model.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use npcchat_core::{Mood, Responder};
    use npcchat_llm::ChatRole;
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

    fn config() -> LlmConfig {
        LlmConfig {
            timeout_ms: 2_000,
            ..LlmConfig::default()
        }
    }

    #[test]
    fn request_carries_sampling_settings_and_turns() {
        let remote = RemoteGenerative::new(LlmClient::openai("http://127.0.0.1:9", "sk-test"), &config());
        let context = vec!["Where do I find the mill?".to_string()];
        let chat = remote.build_request(&ReplyRequest {
            npc_name: "Elya the Ranger",
            mood: Mood::Angry,
            context: &context,
            text: "whatever",
        });

        assert_eq!(chat.model, "gpt-3.5-turbo");
        assert_eq!(chat.max_tokens, 60);
        assert_eq!(chat.timeout_ms, 2_000);
        assert_eq!(chat.turns.len(), 3);
        assert_eq!(chat.turns[0].role, ChatRole::System);
        assert!(chat.turns[0].content.contains("Current mood: angry"));
        assert_eq!(chat.turns[2].content, "whatever");
    }

    #[tokio::test]
    async fn unreachable_service_is_a_failure() {
        let remote = RemoteGenerative::new(LlmClient::openai("http://127.0.0.1:9", "sk-test"), &config());
        let result = remote
            .generate(&ReplyRequest {
                npc_name: "Elya",
                mood: Mood::Neutral,
                context: &[],
                text: "hi",
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn responder_falls_back_when_service_is_down() {
        let remote = RemoteGenerative::new(LlmClient::openai("http://127.0.0.1:9", "sk-test"), &config());
        let responder = Responder::new(Some(remote));
        let reply = responder
            .reply(&ReplyRequest {
                npc_name: "Elya",
                mood: Mood::Friendly,
                context: &[],
                text: "Where do I find the mill?",
            })
            .await;
        assert_eq!(reply.text, "Follow the east road to the mill. The elder can help you!");
        assert_eq!(reply.source, ReplySource::Fallback);
    }

    #[tokio::test]
    async fn responder_falls_back_when_service_times_out() {
        let config = LlmConfig {
            timeout_ms: 300,
            ..LlmConfig::default()
        };
        let remote = RemoteGenerative::new(LlmClient::openai(silent_endpoint().await, "sk-test"), &config);
        let request = ReplyRequest {
            npc_name: "Elya",
            mood: Mood::Neutral,
            context: &[],
            text: "hello",
        };

        let failure = remote.generate(&request).await.unwrap_err();
        assert!(failure.to_string().contains("timed out after 300ms"), "got {failure}");

        let reply = Responder::new(Some(remote)).reply(&request).await;
        assert_eq!(reply.text, "What do you need? I can offer directions or information.");
        assert_eq!(reply.source, ReplySource::Fallback);
    }
}
