//! Sync cycles over every configured pair

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use offsite_engine::{TransferEngine, human_bytes};
use offsite_meta::{EndpointRegistry, SyncPair};
use tokio::sync::mpsc;

use crate::alert::AlertSink;
use crate::error::{Error, Result};
use crate::pair_context::PairContext;
use crate::schedule::Cycle;
use crate::status::{ServiceState, ServiceUpdate, StatusSink};

use super::progress::ProgressTracker;

/// Service name published to the status sink
pub const SYNC_SERVICE: &str = "remote_sync";

/// Output lines kept for a failure report
const FAILURE_TAIL_LINES: usize = 20;

/// Outcome of one sync cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Pairs that synced successfully
    pub synced: Vec<String>,
    /// One message per failed pair
    pub errors: Vec<String>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Drives the transfer engine over every pair, one pair at a time.
///
/// A failure on one pair is logged and alerted, then the next pair runs.
pub struct SyncOrchestrator {
    engine: Arc<dyn TransferEngine>,
    registry: Arc<EndpointRegistry>,
    pairs: Vec<SyncPair>,
    alerts: Arc<dyn AlertSink>,
    status: Arc<dyn StatusSink>,
    interval: Duration,
}

impl SyncOrchestrator {
    pub fn new(
        engine: Arc<dyn TransferEngine>,
        registry: Arc<EndpointRegistry>,
        pairs: Vec<SyncPair>,
        alerts: Arc<dyn AlertSink>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            engine,
            registry,
            pairs,
            alerts,
            status,
            interval: Duration::from_secs(6 * 60 * 60),
        }
    }

    /// Interval used for the published next-run time.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn pairs(&self) -> &[SyncPair] {
        &self.pairs
    }

    /// Sync every pair once.
    pub async fn sync_all(&self) -> SyncReport {
        let mut report = SyncReport::default();
        self.status
            .update_service(
                SYNC_SERVICE,
                ServiceUpdate::new(ServiceState::Running)
                    .detail(format!("Syncing {} pairs", self.pairs.len()))
                    .last_run_at(Utc::now()),
            )
            .await;

        for pair in &self.pairs {
            self.status
                .update_service(
                    SYNC_SERVICE,
                    ServiceUpdate::new(ServiceState::Running).detail(format!("Syncing {}", pair)),
                )
                .await;

            match self.sync_pair(pair).await {
                Ok(()) => report.synced.push(pair.to_string()),
                Err(e) => {
                    tracing::error!(pair = %pair, error = %e, "Sync failed");
                    let message = format!("Sync {} failed: {}", pair, e);
                    self.alerts.send(&message).await;
                    report.errors.push(message);
                }
            }
        }

        let (state, detail) = if report.is_success() {
            (
                ServiceState::Idle,
                format!("Synced {} pairs", report.synced.len()),
            )
        } else {
            (
                ServiceState::Degraded,
                format!(
                    "{} of {} pairs failed to sync",
                    report.errors.len(),
                    self.pairs.len()
                ),
            )
        };
        self.status
            .update_service(
                SYNC_SERVICE,
                ServiceUpdate::new(state)
                    .detail(detail)
                    .next_run_in(Utc::now(), self.interval),
            )
            .await;

        report
    }

    /// Sync a single pair, streaming progress into one editable status message.
    pub async fn sync_pair(&self, pair: &SyncPair) -> Result<()> {
        let context = PairContext::enter(pair, &self.registry)?;
        let src = context.src().address();
        let dst = context.dst().address();

        let handle = self
            .alerts
            .create_status(&format!("Syncing {} → {}", src, dst))
            .await;
        let mut progress = ProgressTracker::new(src, dst, FAILURE_TAIL_LINES);

        let (lines_tx, mut lines_rx) = mpsc::unbounded_channel();
        let transfer = self.engine.sync(src, dst, lines_tx);
        let report_progress = async {
            while let Some(line) = lines_rx.recv().await {
                if let Some(update) = progress.observe(&line) {
                    self.alerts.update_status(&handle, &update).await;
                }
            }
        };
        let (outcome, ()) = tokio::join!(transfer, report_progress);
        let outcome = outcome?;

        if outcome.is_success() {
            let message = match progress.last_status() {
                Some(status) => format!(
                    "Synced {} → {} ({} transferred)",
                    src,
                    dst,
                    human_bytes(status.stats.bytes)
                ),
                None => format!("Synced {} → {}", src, dst),
            };
            tracing::info!(src, dst, "Sync completed");
            self.alerts.send(&message).await;
            Ok(())
        } else {
            Err(Error::TransferFailed {
                pair: pair.to_string(),
                code: outcome.code,
                output: progress.tail(),
            })
        }
    }
}

#[async_trait]
impl Cycle for SyncOrchestrator {
    fn name(&self) -> &str {
        "sync"
    }

    async fn run_cycle(&self) -> Result<()> {
        let report = self.sync_all().await;
        tracing::info!(
            synced = report.synced.len(),
            failed = report.errors.len(),
            "Sync cycle finished"
        );
        Ok(())
    }
}
