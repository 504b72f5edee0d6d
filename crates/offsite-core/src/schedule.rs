//! Repeating cycles with cancellation
//!
//! A [`Scheduler`] runs one [`Cycle`] at a time on a fixed interval until its
//! shutdown token is cancelled. Every run happens in its own task, so an
//! `Err` or a panic inside a cycle is logged, alerted, and followed by the
//! normal sleep instead of taking the process down.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::alert::AlertSink;
use crate::error::Result;

/// One pass of a long-running loop.
#[async_trait]
pub trait Cycle: Send + Sync + 'static {
    /// Short name used in logs and failure alerts.
    fn name(&self) -> &str;

    async fn run_cycle(&self) -> Result<()>;
}

pub struct Scheduler {
    interval: Duration,
    shutdown: CancellationToken,
    alerts: Arc<dyn AlertSink>,
}

impl Scheduler {
    pub fn new(interval: Duration, shutdown: CancellationToken, alerts: Arc<dyn AlertSink>) -> Self {
        Self {
            interval,
            shutdown,
            alerts,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run exactly one cycle.
    ///
    /// Failures are alerted before being returned. Cancellation aborts the
    /// running cycle and returns `Ok`.
    pub async fn run_once(&self, cycle: Arc<dyn Cycle>) -> Result<()> {
        let name = cycle.name().to_string();
        tracing::debug!(cycle = %name, "Starting cycle");

        let task = {
            let cycle = Arc::clone(&cycle);
            tokio::spawn(async move { cycle.run_cycle().await })
        };
        let abort = task.abort_handle();

        let joined = tokio::select! {
            joined = task => joined,
            _ = self.shutdown.cancelled() => {
                abort.abort();
                tracing::info!(cycle = %name, "Cycle interrupted by shutdown");
                return Ok(());
            }
        };

        // A panic surfaces as a JoinError and is treated like any other failure
        let result: Result<()> = joined.map_err(Into::into).and_then(|inner| inner);
        if let Err(e) = &result {
            tracing::error!(cycle = %name, error = %e, "Cycle failed");
            self.alerts
                .send(&format!("{} cycle failed: {}", name, e))
                .await;
        }
        result
    }

    /// Run cycles until the shutdown token is cancelled.
    pub async fn run(&self, cycle: Arc<dyn Cycle>) {
        tracing::info!(
            cycle = cycle.name(),
            interval_secs = self.interval.as_secs(),
            "Scheduler started"
        );

        while !self.shutdown.is_cancelled() {
            // Already alerted and logged
            let _ = self.run_once(Arc::clone(&cycle)).await;

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!(cycle = cycle.name(), "Scheduler stopped");
    }
}
