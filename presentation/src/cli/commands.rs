//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for dbl-chat
#[derive(Parser, Debug, Default)]
#[command(name = "dbl-chat")]
#[command(author, version, about = "Terminal chat client for the dbl agent gateway")]
#[command(long_about = r#"
dbl-chat submits chat turns to an agent gateway and prints the matching
response for each one.

Responses are read from the gateway's live tail stream when it is
advertised, otherwise by polling event log snapshots.

Configuration is merged from (highest priority first):
1. Command line flags
2. DBL_CHAT_<SECTION>__<KEY> environment variables
3. --config <path>     Explicit config file
4. ./dbl-chat.toml     Project-level config
5. ~/.config/dbl-chat/config.toml   Global config

Example:
  dbl-chat --principal-id alice
  dbl-chat --principal-id alice --model-id gpt-4.1 --provider openai
  dbl-chat --base-url http://gateway:8010 --no-stream
"#)]
pub struct Cli {
    /// Gateway base URL [default: http://127.0.0.1:8010]
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Model to request (defaults to the gateway's first advertised model)
    #[arg(long, value_name = "MODEL")]
    pub model_id: Option<String>,

    /// Provider to request
    #[arg(long, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Upper bound on generated tokens per response
    #[arg(long, value_name = "N")]
    pub max_output_tokens: Option<u32>,

    /// Principal the intents are submitted as
    #[arg(long, value_name = "ID")]
    pub principal_id: Option<String>,

    /// Workspace the intents belong to
    #[arg(long, value_name = "ID")]
    pub workspace_id: Option<String>,

    /// Lane stamped on submitted intents [default: user]
    #[arg(long, value_name = "LANE")]
    pub lane: Option<String>,

    /// Poll snapshots even when the gateway offers a tail stream
    #[arg(long)]
    pub no_stream: bool,

    /// Append a JSONL conversation transcript to this file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the waiting spinner
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}
