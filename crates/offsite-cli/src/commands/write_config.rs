//! Write-config command implementation

use colored::Colorize;

use crate::context::AppContext;
use crate::error::Result;

pub async fn run_write_config(ctx: &AppContext) -> Result<()> {
    ctx.write_engine_config().await?;
    println!(
        "{} engine config written to {}",
        "OK".green().bold(),
        ctx.engine.config_path().as_str().cyan()
    );
    Ok(())
}
