//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for toolrun
#[derive(Parser, Debug)]
#[command(name = "toolrun")]
#[command(author, version, about = "Tool-call orchestration - run the tools a model asks for")]
#[command(long_about = r#"
toolrun replays a recorded model output through the tool pipeline:

1. Selection: the active tools are chosen from preferences and config
2. Choosing calls: tool calls are extracted from the transcript
3. Execution: every call runs concurrently, updates stream as they happen

Each update is printed as one JSON line, followed by a JSON array of the
final results. Transcripts ending in .json are read as native tool calls
({"tool_calls": [...]}), anything else as plain model text.

Configuration files are loaded from (in priority order):
1. TOOLRUN_* environment variables
2. --config <path>     Explicit config file
3. ./toolrun.toml      Project-level config
4. ~/.config/toolrun/config.toml   Global config

Example:
  toolrun --transcript turn.txt --message "What's new in Rust?"
  toolrun --transcript turn.json --attach notes.md --disable websearch
  toolrun --transcript turn.txt --assistant --events updates.jsonl -vv
"#)]
pub struct Cli {
    /// Recorded model output to replay
    #[arg(short, long, value_name = "PATH")]
    pub transcript: PathBuf,

    /// User message for the turn
    #[arg(short, long, default_value = "")]
    pub message: String,

    /// Files to attach to the user message (can be specified multiple times)
    #[arg(short, long, value_name = "PATH")]
    pub attach: Vec<PathBuf>,

    /// Run the turn for an assistant (fixed tool selection)
    #[arg(long)]
    pub assistant: bool,

    /// Enable a tool for this turn (can be specified multiple times)
    #[arg(long, value_name = "TOOL")]
    pub enable: Vec<String>,

    /// Disable a tool for this turn (can be specified multiple times)
    #[arg(long, value_name = "TOOL")]
    pub disable: Vec<String>,

    /// Write every update to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub events: Option<PathBuf>,

    /// Write diagnostics to this file in addition to stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,
}
