//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// offsite - keep backups synchronized across storage endpoints and verify
/// they read back
#[derive(Parser, Debug)]
#[command(name = "offsite")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the daemon configuration file
    #[arg(short, long, global = true, env = "OFFSITE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the sync and validation loops until interrupted
    ///
    /// Writes the engine config first, then syncs every pair on the backup
    /// interval and spot-checks recent files on the validation interval.
    Run,

    /// Write the transfer engine config and exit
    WriteConfig,

    /// Run one sync cycle over every pair
    Sync,

    /// Run one validation cycle and print the report
    Validate,

    /// Validate the configuration and list endpoints and pairs
    Check,
}
