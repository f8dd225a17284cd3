//! Configuration for a chat run.
//!
//! Loadable from TOML; every field has a default so an empty file (or no
//! file at all) is a valid configuration. Command-line flags are layered on
//! top by the binary.
//!
//! ```toml
//! [npc]
//! name = "Elya the Ranger"
//!
//! [llm]
//! model = "gpt-3.5-turbo"
//! base_url = "https://api.openai.com"
//! timeout_ms = 10000
//!
//! [output]
//! log_path = "logs/chat_log.jsonl"
//! write_log = true
//! log_format = "pretty"   # or "json"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default NPC display name.
pub const DEFAULT_NPC_NAME: &str = "Elya the Ranger";
/// Default chat model identifier.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
/// Default JSON-lines log path.
pub const DEFAULT_LOG_PATH: &str = "logs/chat_log.jsonl";

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Persona settings.
    #[serde(default)]
    pub npc: NpcConfig,
    /// Remote generative service settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Output and diagnostics settings.
    #[serde(default)]
    pub output: OutputConfig,
}

impl ChatConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `ChatError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::ChatError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::ChatError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Persona settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcConfig {
    /// Name used in prompts and log records.
    #[serde(default = "default_npc_name")]
    pub name: String,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NPC_NAME.to_string(),
        }
    }
}

/// Remote generative service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model identifier passed to the service.
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of an OpenAI-compatible endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum tokens generated per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_ms: 10_000,
            max_tokens: 60,
            temperature: 0.7,
        }
    }
}

/// Output and diagnostics settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where the JSON-lines log is written.
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
    /// Whether to write the log file at all.
    #[serde(default = "default_true")]
    pub write_log: bool,
    /// Diagnostic log format on stderr.
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Diagnostic log format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            write_log: true,
            log_format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}
fn default_npc_name() -> String {
    DEFAULT_NPC_NAME.to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_max_tokens() -> u32 {
    60
}
fn default_temperature() -> f32 {
    0.7
}
fn default_log_path() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_PATH)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
