//! CLI command definitions

use clap::{ArgAction, Parser, ValueEnum};
use lmagent_domain::ConfirmationMode;
use std::path::PathBuf;

/// How destructive shell commands are confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfirmationModeArg {
    /// Ask on the console
    Interactive,
    /// Approve everything, preferring the trash over rm
    AutoApprove,
    /// Decline every destructive command
    AutoReject,
}

impl From<ConfirmationModeArg> for ConfirmationMode {
    fn from(arg: ConfirmationModeArg) -> Self {
        match arg {
            ConfirmationModeArg::Interactive => ConfirmationMode::Interactive,
            ConfirmationModeArg::AutoApprove => ConfirmationMode::AutoApprove,
            ConfirmationModeArg::AutoReject => ConfirmationMode::AutoReject,
        }
    }
}

/// CLI arguments for lmagent
#[derive(Parser, Debug)]
#[command(name = "lmagent")]
#[command(author, version, about = "Conversational agent shell for local LM Studio models")]
#[command(long_about = r#"
lmagent connects a model served by LM Studio to a small set of tools
(shell, files, web search) with layered memory. Destructive shell commands
are confirmed before they run, and find-then-remove commands can be turned
into a move to the trash.

Configuration files are loaded from (in priority order):
1. LMAGENT_* environment variables
2. --config <path>     Explicit config file (JSON or TOML)
3. ./lmagent.toml, ./config.json   Project-level config
4. ~/.config/lmagent/config.toml   Global config

Example:
  lmagent
  lmagent --model qwen2.5-7b-instruct --dev
  lmagent --confirmation-mode auto-reject --log-conversation session.jsonl
"#)]
pub struct Cli {
    /// Model key to use, skipping the selection menu
    #[arg(short, long, env = "LMS_MODEL", value_name = "MODEL")]
    pub model: Option<String>,

    /// Enable development mode (!tokens, !memory, !stats, !clear, !help)
    #[arg(
        long,
        env = "DEV_MODE",
        value_parser = clap::builder::BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true",
        default_value_t = false
    )]
    pub dev: bool,

    /// LM Studio server URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// How destructive commands are confirmed
    #[arg(long, value_enum, value_name = "MODE")]
    pub confirmation_mode: Option<ConfirmationModeArg>,

    /// Append the conversation as JSON lines to this file
    #[arg(long, value_name = "PATH")]
    pub log_conversation: Option<PathBuf>,

    /// List available LLM models and exit
    #[arg(long)]
    pub list_models: bool,

    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Path to config file (overrides project and global config)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Ignore all config files and use defaults
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
