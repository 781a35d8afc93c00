//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for innovation-casino
#[derive(Parser, Debug)]
#[command(name = "innovation-casino")]
#[command(author, version, about = "Innovation Casino - two-round chip voting engine")]
#[command(long_about = r#"
Innovation Casino runs a facilitated, two-round voting session.

Participants spend a fixed budget of time, talent and trust chips:
1. Round one: chips go to organisational pain points
2. Routing: each participant is sent to the pain point they backed most
3. Round two: chips go to candidate solutions for that pain point

Configuration files are loaded from (in priority order):
1. CASINO_* environment variables (CASINO_SESSION__CHIPS_PER_TYPE=5)
2. --config <path>     Explicit config file
3. ./casino.toml       Project-level config
4. ~/.config/innovation-casino/config.toml   Global config

Example:
  innovation-casino simulate --participants 24 --seed 7
  innovation-casino simulate --events session.events.jsonl
  innovation-casino config
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a complete two-round session with synthetic participants
    Simulate {
        /// Number of synthetic participants
        #[arg(short, long, default_value_t = 12)]
        participants: usize,

        /// Seed for synthetic allocations and routing tie-breaks
        #[arg(short, long)]
        seed: Option<u64>,

        /// Append every session event to this JSONL file
        #[arg(long, value_name = "PATH")]
        events: Option<PathBuf>,

        /// Print compact JSON instead of pretty-printed JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show configuration sources, effective values and issues
    Config,
}
