//! Check command implementation

use colored::Colorize;
use offsite_meta::Endpoint;

use crate::context::AppContext;
use crate::error::Result;

/// Print the validated configuration.
pub fn run_check(ctx: &AppContext) -> Result<()> {
    println!("{}", "Configuration OK".green().bold());
    println!();
    println!("{}:  {}", "Config".dimmed(), ctx.config_path.as_str());
    println!("{}:  {}", "Engine".dimmed(), ctx.config.engine.binary);
    println!(
        "{}:  {}",
        "Remotes".dimmed(),
        ctx.engine.config_path().as_str()
    );
    println!();

    println!("{}:", "Endpoints".bold());
    if ctx.registry.is_empty() {
        println!("  {}", "None".dimmed());
    }
    for (nickname, endpoint) in ctx.registry.iter() {
        let kind = match endpoint {
            Endpoint::Share(share) => format!("share at {}", share.host),
            Endpoint::Object(_) => "object store".to_string(),
        };
        let encrypted = if endpoint.encrypt_key().is_some() {
            " (encrypted)".yellow().to_string()
        } else {
            String::new()
        };
        println!("  {} {}: {}{}", "+".green(), nickname.cyan(), kind, encrypted);
    }
    println!();

    println!("{}:", "Sync pairs".bold());
    if ctx.config.backups.sync.is_empty() {
        println!("  {}", "None".dimmed());
    }
    for pair in &ctx.config.backups.sync {
        println!("  {} {}", "+".green(), pair);
    }

    Ok(())
}
