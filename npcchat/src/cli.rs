//! Command-line arguments and their layering over the TOML configuration.
//!
//! Precedence: flag > `--config` file > built-in default.

use std::path::PathBuf;

use clap::Parser;
use npcchat_core::config::LogFormat;
use npcchat_core::{ChatConfig, ChatError};

/// `--log-format` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "npcchat", version, about = "NPC chat system")]
pub struct Args {
    /// Input JSON file with player messages
    pub input_file: PathBuf,

    /// Output log file [default: logs/chat_log.jsonl]
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Don't write a log file, console only
    #[arg(long, conflicts_with = "log")]
    pub no_log: bool,

    /// Chat model to use [default: gpt-3.5-turbo]
    #[arg(long)]
    pub model: Option<String>,

    /// NPC name [default: Elya the Ranger]
    #[arg(long)]
    pub npc_name: Option<String>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL of an OpenAI-compatible endpoint
    #[arg(long)]
    pub base_url: Option<String>,

    /// Per-request timeout for the remote model, in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Diagnostic log format on stderr
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormatArg>,
}

impl Args {
    /// Build the effective configuration.
    ///
    /// # Errors
    /// Returns `ChatError::Config` if the `--config` file can't be read or parsed.
    pub fn resolve(&self) -> Result<ChatConfig, ChatError> {
        let mut config = match &self.config {
            Some(path) => ChatConfig::from_file(path)?,
            None => ChatConfig::default(),
        };

        if let Some(log) = &self.log {
            config.output.log_path = log.clone();
        }
        if self.no_log {
            config.output.write_log = false;
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(name) = &self.npc_name {
            config.npc.name = name.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.llm.base_url = base_url.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.llm.timeout_ms = timeout_ms;
        }
        if let Some(format) = self.log_format {
            config.output.log_format = format.into();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("npcchat").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_reference_cli() {
        let config = parse(&["messages.json"]).resolve().unwrap();
        assert_eq!(config.output.log_path, Path::new("logs/chat_log.jsonl"));
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.npc.name, "Elya the Ranger");
        assert!(config.output.write_log);
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&[
            "in.json",
            "--log",
            "out/run.jsonl",
            "--model",
            "gpt-4o-mini",
            "--npc-name",
            "Borin",
            "--log-format",
            "json",
        ]);
        assert_eq!(args.input_file, Path::new("in.json"));
        let config = args.resolve().unwrap();
        assert_eq!(config.output.log_path, Path::new("out/run.jsonl"));
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.npc.name, "Borin");
        assert_eq!(config.output.log_format, LogFormat::Json);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("npcchat.toml");
        std::fs::write(
            &path,
            "[npc]\nname = \"Mira\"\n[llm]\nmodel = \"from-file\"\ntimeout_ms = 500\n",
        )
        .unwrap();

        let config = parse(&["in.json", "--config", path.to_str().unwrap(), "--model", "from-flag"])
            .resolve()
            .unwrap();
        assert_eq!(config.npc.name, "Mira");
        assert_eq!(config.llm.model, "from-flag");
        assert_eq!(config.llm.timeout_ms, 500);
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(Args::try_parse_from(["npcchat", "in.json", "--log-format", "xml"]).is_err());
    }

    #[test]
    fn no_log_disables_file_sink() {
        let config = parse(&["in.json", "--no-log"]).resolve().unwrap();
        assert!(!config.output.write_log);
    }

    #[test]
    fn input_file_is_required() {
        assert!(Args::try_parse_from(["npcchat"]).is_err());
        assert!(Args::try_parse_from(["npcchat", "in.json", "--log", "a", "--no-log"]).is_err());
    }
}
