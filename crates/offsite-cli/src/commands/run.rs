//! Daemon command implementation

use std::sync::Arc;

use offsite_core::{CancellationToken, Scheduler};

use crate::context::AppContext;
use crate::error::Result;

/// Run the sync and validation loops side by side until Ctrl-C.
pub async fn run_daemon(ctx: &AppContext) -> Result<()> {
    // Written once, before any engine process can read it
    ctx.write_engine_config().await?;

    let shutdown = CancellationToken::new();
    let orchestrator = Arc::new(ctx.orchestrator());
    let sampler = Arc::new(ctx.sampler());
    sampler.announce().await;

    let sync_loop = Scheduler::new(
        ctx.config.backups.interval(),
        shutdown.clone(),
        ctx.alerts.clone(),
    );
    let validation_loop = Scheduler::new(
        ctx.config.validation.interval(),
        shutdown.clone(),
        ctx.alerts.clone(),
    );

    let interrupt = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown requested");
                    shutdown.cancel();
                }
                Err(e) => tracing::warn!(error = %e, "Could not listen for Ctrl-C"),
            }
        })
    };

    tracing::info!(
        pairs = ctx.config.backups.sync.len(),
        endpoints = ctx.registry.len(),
        "Daemon started"
    );
    tokio::join!(sync_loop.run(orchestrator), validation_loop.run(sampler));

    interrupt.abort();
    for status in ctx.status.snapshot().await {
        tracing::info!(service = %status.name, state = %status.state, "Final service status");
    }
    Ok(())
}
