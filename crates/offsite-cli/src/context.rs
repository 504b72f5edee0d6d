//! Loaded configuration and the shared handles built from it

use std::path::Path;
use std::sync::Arc;

use offsite_core::{
    AlertSink, ConfigWriter, LogAlertSink, SamplerSettings, StatusBoard, SyncOrchestrator,
    ValidationSampler,
};
use offsite_engine::RcloneEngine;
use offsite_fs::NormalizedPath;
use offsite_meta::config::DEFAULT_CONFIG_FILE;
use offsite_meta::{DaemonConfig, EndpointRegistry, validate_config};

use crate::error::Result;

pub struct AppContext {
    pub config_path: NormalizedPath,
    pub config: DaemonConfig,
    pub registry: Arc<EndpointRegistry>,
    pub engine: Arc<RcloneEngine>,
    pub alerts: Arc<dyn AlertSink>,
    pub status: Arc<StatusBoard>,
}

impl AppContext {
    /// Load and validate the daemon configuration.
    ///
    /// Any configuration error surfaces here, before the engine is touched.
    pub fn load(config_override: Option<&Path>) -> Result<Self> {
        let config_path = match config_override {
            Some(path) => NormalizedPath::new(path),
            None => offsite_fs::expand_home(DEFAULT_CONFIG_FILE)?,
        };
        tracing::debug!(path = %config_path.as_str(), "Loading configuration");

        let config = DaemonConfig::load(&config_path)?;
        let registry = validate_config(&config)?;

        let engine = RcloneEngine::new(&config.engine.binary, config.engine.resolved_config_path()?)
            .with_stats_interval(config.engine.stats_interval());

        Ok(Self {
            config_path,
            config,
            registry: Arc::new(registry),
            engine: Arc::new(engine),
            alerts: Arc::new(LogAlertSink::new()),
            status: Arc::new(StatusBoard::new()),
        })
    }

    /// Regenerate the engine config from the registry.
    pub async fn write_engine_config(&self) -> Result<()> {
        ConfigWriter::new(self.engine.as_ref())
            .write(&self.registry, self.engine.config_path())
            .await?;
        Ok(())
    }

    pub fn orchestrator(&self) -> SyncOrchestrator {
        SyncOrchestrator::new(
            self.engine.clone(),
            self.registry.clone(),
            self.config.backups.sync.clone(),
            self.alerts.clone(),
            self.status.clone(),
        )
        .with_interval(self.config.backups.interval())
    }

    pub fn sampler(&self) -> ValidationSampler {
        ValidationSampler::new(
            self.engine.clone(),
            self.config.backups.sync.clone(),
            self.alerts.clone(),
            self.status.clone(),
            SamplerSettings::from(&self.config.validation),
        )
    }
}
