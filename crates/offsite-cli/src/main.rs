//! offsite CLI
//!
//! Keeps backups synchronized across network shares, object storage, and
//! local paths, and periodically verifies that recent backups read back.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::AppContext;
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to initialize logging: {}", "warning".yellow().bold(), e);
    }

    if let Err(e) = run(cli).await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = AppContext::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run => commands::run_daemon(&ctx).await,
        Commands::WriteConfig => commands::run_write_config(&ctx).await,
        Commands::Sync => commands::run_sync(&ctx).await,
        Commands::Validate => commands::run_validate(&ctx).await,
        Commands::Check => commands::run_check(&ctx),
    }
}
