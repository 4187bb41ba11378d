//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How the final answer is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The answer text only
    Text,
    /// Answer, rounds and stop cause as JSON
    Json,
    /// The full transcript as JSON lines
    Transcript,
}

impl From<OutputFormat> for relay_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => relay_domain::OutputFormat::Text,
            OutputFormat::Json => relay_domain::OutputFormat::Json,
            OutputFormat::Transcript => relay_domain::OutputFormat::Transcript,
        }
    }
}

/// CLI arguments for tool-relay
#[derive(Parser, Debug)]
#[command(name = "tool-relay")]
#[command(author, version, about = "Run a tool-augmented conversation with an LLM")]
#[command(long_about = r#"
tool-relay sends your prompt to an OpenAI-compatible model together with the
built-in tools (read_file, current_time). Whenever the model requests tools,
they run concurrently and their results are fed back until the model answers.

Configuration files are loaded from (in priority order):
1. TOOL_RELAY_* environment variables (e.g. TOOL_RELAY_MODEL__MODEL=llama3.1)
2. --config <path>     Explicit config file
3. ./tool-relay.toml   Project-level config
4. ~/.config/tool-relay/config.toml   Global config

Example:
  tool-relay "What time is it in UTC?"
  tool-relay --output json "Summarize ./Cargo.toml"
  TOOL_RELAY_MODEL__BASE_URL=http://localhost:11434/v1 tool-relay "Hi"
"#)]
pub struct Cli {
    /// The prompt to send (required unless --show-config)
    pub prompt: Option<String>,

    /// System prompt override
    #[arg(short, long, value_name = "TEXT")]
    pub system: Option<String>,

    /// Maximum tool executions in flight (overrides config)
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress tool status output
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective config, then exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full() {
        let cli = Cli::try_parse_from([
            "tool-relay",
            "--system",
            "Be brief.",
            "--max-concurrency",
            "2",
            "--output",
            "json",
            "-vv",
            "What time is it?",
        ])
        .unwrap();

        assert_eq!(cli.prompt.as_deref(), Some("What time is it?"));
        assert_eq!(cli.system.as_deref(), Some("Be brief."));
        assert_eq!(cli.max_concurrency, Some(2));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["tool-relay", "--show-config"]).unwrap();
        assert!(cli.prompt.is_none());
        assert!(cli.show_config);
        assert_eq!(cli.output, OutputFormat::Text);
        assert_eq!(
            relay_domain::OutputFormat::from(cli.output),
            relay_domain::OutputFormat::Text
        );
    }
}
