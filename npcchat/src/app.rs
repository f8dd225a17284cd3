//! Wiring: configuration → responder → pipeline → sinks.

use std::path::Path;

use anyhow::Context;
use npcchat_core::config::{LlmConfig, LogFormat};
use npcchat_core::message::parse_batch;
use npcchat_core::pipeline::order_batch;
use npcchat_core::{ChatConfig, JsonLinesSink, Pipeline, RecordSink, Responder, RunSummary};
use npcchat_llm::LlmClient;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::remote::RemoteGenerative;

/// Install the stderr diagnostic subscriber. `RUST_LOG` wins over `info`.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed (tests); keep it.
    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
}

/// Read the API key from `var`, treating an empty value as absent.
#[must_use]
pub fn api_key_from_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|key| !key.trim().is_empty())
}

/// Pick the reply strategy once, at startup.
///
/// No key means degraded mode: announced here, then silent.
#[must_use]
pub fn build_responder(config: &LlmConfig, api_key: Option<String>) -> Responder<RemoteGenerative> {
    match api_key {
        Some(key) => {
            info!(model = %config.model, base_url = %config.base_url, "remote replies enabled");
            let client = LlmClient::openai(config.base_url.clone(), key);
            Responder::new(Some(RemoteGenerative::new(client, config)))
        }
        None => {
            warn!(
                "{} not set - using rule-based fallback mode",
                config.api_key_env
            );
            Responder::new(None)
        }
    }
}

/// Process `input` end to end: parse, order, reply, emit to console and file.
///
/// # Errors
/// Fatal on unreadable input, malformed JSON, malformed timestamps, or a
/// sink failure. Malformed input never touches the log file.
pub async fn run(config: &ChatConfig, input: &Path, api_key: Option<String>) -> anyhow::Result<RunSummary> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read input file {}", input.display()))?;
    let batch = order_batch(parse_batch(&raw)?)?;

    let responder = build_responder(&config.llm, api_key);
    let mut pipeline = Pipeline::new(config.npc.name.clone(), responder);

    let mut console = JsonLinesSink::stdout();
    let mut file = if config.output.write_log {
        let path = &config.output.log_path;
        Some(
            JsonLinesSink::create_file(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?,
        )
    } else {
        None
    };

    let mut sinks: Vec<&mut dyn RecordSink> = vec![&mut console];
    if let Some(file) = file.as_mut() {
        sinks.push(file);
    }

    let summary = pipeline.run_ordered(batch, &mut sinks).await?;
    Ok(summary)
}
