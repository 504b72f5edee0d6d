//! One-shot sync command implementation

use colored::Colorize;

use crate::context::AppContext;
use crate::error::{CliError, Result};

/// Sync every pair once. Fails if any pair failed.
pub async fn run_sync(ctx: &AppContext) -> Result<()> {
    ctx.write_engine_config().await?;
    let report = ctx.orchestrator().sync_all().await;

    for pair in &report.synced {
        println!("{} {}", "synced".green(), pair);
    }
    for error in &report.errors {
        println!("{} {}", "failed".red(), error);
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} of {} pairs failed to sync",
            report.errors.len(),
            report.errors.len() + report.synced.len()
        )))
    }
}
