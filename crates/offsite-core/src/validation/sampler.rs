//! Periodic read-back checks of recent backups

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use offsite_engine::{AgeWindow, TransferEngine};
use offsite_meta::{SyncPair, ValidationConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::collect::{build_object_path, collect_candidates};
use crate::alert::AlertSink;
use crate::error::Result;
use crate::schedule::Cycle;
use crate::status::{ServiceState, ServiceUpdate, StatusSink};

/// Service name published to the status sink
pub const VALIDATION_SERVICE: &str = "remote_validation";

/// Error lines included in a failure alert
const ALERT_ERROR_LINES: usize = 10;

/// Sampling parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerSettings {
    pub sample_size: usize,
    pub window: AgeWindow,
    pub interval: Duration,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self::from(&ValidationConfig::default())
    }
}

impl From<&ValidationConfig> for SamplerSettings {
    fn from(config: &ValidationConfig) -> Self {
        Self {
            sample_size: config.sample_size,
            window: AgeWindow::new(config.min_age(), config.max_age()),
            interval: config.interval(),
        }
    }
}

/// Result of validating one pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairValidation {
    pub checked: usize,
    pub errors: Vec<String>,
}

/// Result of one validation cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub pairs: usize,
    pub checked: usize,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// One-line outcome, used as the service detail.
    pub fn detail(&self) -> String {
        if self.is_clean() {
            format!(
                "Validated {} files across {} pairs",
                self.checked, self.pairs
            )
        } else {
            format!("Validation failed: {} issues detected", self.errors.len())
        }
    }

    /// Multi-line alert text listing the first errors.
    pub fn summary(&self) -> String {
        if self.is_clean() {
            return self.detail();
        }

        let mut lines = vec![
            "Remote backup validation failed.".to_string(),
            format!(
                "Checked {} files across {} pairs.",
                self.checked, self.pairs
            ),
            "Issues:".to_string(),
        ];
        lines.extend(
            self.errors
                .iter()
                .take(ALERT_ERROR_LINES)
                .map(|e| format!("• {}", e)),
        );
        if self.errors.len() > ALERT_ERROR_LINES {
            lines.push(format!(
                "...and {} more.",
                self.errors.len() - ALERT_ERROR_LINES
            ));
        }
        lines.join("\n")
    }
}

/// Spot-checks that recently written source files read back at their
/// destinations.
pub struct ValidationSampler {
    engine: Arc<dyn TransferEngine>,
    pairs: Vec<SyncPair>,
    alerts: Arc<dyn AlertSink>,
    status: Arc<dyn StatusSink>,
    settings: SamplerSettings,
    rng: Mutex<StdRng>,
}

impl ValidationSampler {
    pub fn new(
        engine: Arc<dyn TransferEngine>,
        pairs: Vec<SyncPair>,
        alerts: Arc<dyn AlertSink>,
        status: Arc<dyn StatusSink>,
        settings: SamplerSettings,
    ) -> Self {
        Self {
            engine,
            pairs,
            alerts,
            status,
            settings,
            rng: Mutex::new(StdRng::from_rng(&mut rand::rng())),
        }
    }

    /// Use a fixed seed for candidate sampling.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    pub fn settings(&self) -> &SamplerSettings {
        &self.settings
    }

    /// Publish the initial waiting status.
    pub async fn announce(&self) {
        self.status
            .update_service(
                VALIDATION_SERVICE,
                ServiceUpdate::new(ServiceState::Idle)
                    .detail("Waiting to start remote validation")
                    .next_run_at(Utc::now()),
            )
            .await;
    }

    /// Validate one pair.
    ///
    /// Missing candidates and failed reads are returned as error strings;
    /// only a failure to collect candidates at all is an `Err`.
    pub async fn validate_pair(&self, pair: &SyncPair) -> Result<PairValidation> {
        let label = pair.dst.to_string();
        let base = pair.dst.engine_address();

        let candidates = collect_candidates(
            self.engine.as_ref(),
            &pair.src,
            self.settings.window,
            self.settings.sample_size,
            self.pair_rng(),
        )
        .await?;

        if candidates.is_empty() {
            return Ok(PairValidation {
                checked: 0,
                errors: vec![format!("{}: no recent files found", label)],
            });
        }

        let mut errors = Vec::new();
        for candidate in &candidates {
            let object_path = build_object_path(&base, &candidate.path, &candidate.name);
            match self.engine.read_head(&object_path).await {
                Ok(0) => {
                    tracing::warn!(path = %object_path, "Read zero bytes");
                    errors.push(format!("{}: read zero bytes from {}", label, candidate.path));
                }
                Ok(bytes) => {
                    tracing::trace!(path = %object_path, bytes, "Read back");
                }
                Err(e) => {
                    tracing::warn!(path = %object_path, error = %e, "Read failed");
                    errors.push(format!(
                        "{}: failed to read {}: {}",
                        label, candidate.path, e
                    ));
                }
            }
        }

        Ok(PairValidation {
            checked: candidates.len(),
            errors,
        })
    }

    /// Validate every pair once and publish the outcome.
    pub async fn validate_all(&self) -> ValidationReport {
        let mut report = ValidationReport {
            pairs: self.pairs.len(),
            ..Default::default()
        };

        if self.pairs.is_empty() {
            let now = Utc::now();
            self.status
                .update_service(
                    VALIDATION_SERVICE,
                    ServiceUpdate::new(ServiceState::Idle)
                        .detail("No remote backup pairs configured")
                        .next_run_in(now, self.settings.interval)
                        .last_run_at(now),
                )
                .await;
            return report;
        }

        self.status
            .update_service(
                VALIDATION_SERVICE,
                ServiceUpdate::new(ServiceState::Running)
                    .detail("Starting remote backup validation")
                    .last_run_at(Utc::now()),
            )
            .await;

        for pair in &self.pairs {
            self.status
                .update_service(
                    VALIDATION_SERVICE,
                    ServiceUpdate::new(ServiceState::Running)
                        .detail(format!("Validating {}", pair.dst)),
                )
                .await;

            match self.validate_pair(pair).await {
                Ok(result) => {
                    report.checked += result.checked;
                    report.errors.extend(result.errors);
                }
                Err(e) => {
                    let message = format!("{}: validation failed: {}", pair.dst, e);
                    tracing::error!(pair = %pair, error = %e, "Validation failed");
                    report.errors.push(message);
                }
            }
        }

        let state = if report.is_clean() {
            ServiceState::Idle
        } else {
            ServiceState::Degraded
        };
        self.status
            .update_service(
                VALIDATION_SERVICE,
                ServiceUpdate::new(state)
                    .detail(report.detail())
                    .next_run_in(Utc::now(), self.settings.interval),
            )
            .await;

        if report.is_clean() {
            tracing::info!(checked = report.checked, pairs = report.pairs, "Validation passed");
        } else {
            tracing::error!(issues = report.errors.len(), "Validation found problems");
            self.alerts.send(&report.summary()).await;
        }

        report
    }

    /// Independent generator for one pair's sampling.
    fn pair_rng(&self) -> StdRng {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        StdRng::from_rng(&mut *rng)
    }
}

#[async_trait]
impl Cycle for ValidationSampler {
    fn name(&self) -> &str {
        "validation"
    }

    async fn run_cycle(&self) -> Result<()> {
        self.validate_all().await;
        Ok(())
    }
}
