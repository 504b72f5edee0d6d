//! One-shot validation command implementation

use colored::Colorize;

use crate::context::AppContext;
use crate::error::{CliError, Result};

pub async fn run_validate(ctx: &AppContext) -> Result<()> {
    ctx.write_engine_config().await?;
    let report = ctx.sampler().validate_all().await;

    if report.is_clean() {
        println!("{} {}", "OK".green().bold(), report.detail());
        Ok(())
    } else {
        println!("{}", report.summary());
        Err(CliError::user(report.detail()))
    }
}
