//! Daemon configuration types and loading
//!
//! This module provides the types behind `~/.offsite/config.toml`: the
//! configured endpoints, the sync pairs, and the tunables for the engine,
//! the sync loop, and the validation loop.

use std::fmt;
use std::time::Duration;

use offsite_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::endpoint::{Endpoint, ObjectEndpoint, ShareEndpoint};
use crate::error::{Error, Result};
use crate::location::FileLocation;

/// Default location of the daemon configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "~/.offsite/config.toml";

/// Default location of the generated transfer-engine configuration.
pub const DEFAULT_ENGINE_CONFIG_FILE: &str = "~/.offsite/rclone.conf";

/// One directional synchronization job. Fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncPair {
    pub src: FileLocation,
    pub dst: FileLocation,
}

impl fmt::Display for SyncPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.src, self.dst)
    }
}

/// Transfer engine invocation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine executable, looked up on `PATH` when not absolute
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Where the generated engine configuration is written
    #[serde(default = "default_engine_config_path")]
    pub config_path: String,
    /// How often the engine emits a stats line during a sync
    #[serde(default = "default_stats_interval_secs")]
    pub stats_interval_secs: u64,
}

fn default_binary() -> String {
    "rclone".to_string()
}

fn default_engine_config_path() -> String {
    DEFAULT_ENGINE_CONFIG_FILE.to_string()
}

fn default_stats_interval_secs() -> u64 {
    30
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            config_path: default_engine_config_path(),
            stats_interval_secs: default_stats_interval_secs(),
        }
    }
}

impl EngineConfig {
    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval_secs)
    }

    /// The engine config path with `~` expanded.
    pub fn resolved_config_path(&self) -> Result<NormalizedPath> {
        Ok(offsite_fs::expand_home(&self.config_path)?)
    }
}

/// Sync loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupConfig {
    #[serde(default)]
    pub sync: Vec<SyncPair>,
    /// Delay between sync cycles
    #[serde(default = "default_sync_interval_secs")]
    pub interval_secs: u64,
}

fn default_sync_interval_secs() -> u64 {
    6 * 60 * 60
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            sync: Vec::new(),
            interval_secs: default_sync_interval_secs(),
        }
    }
}

impl BackupConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Validation sampler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Files sampled per pair and cycle
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    /// Files younger than this may still be mid-write
    #[serde(default = "default_min_age_secs")]
    pub min_age_secs: u64,
    /// Files older than this are outside the usual backup cadence
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
    #[serde(default = "default_validation_interval_secs")]
    pub interval_secs: u64,
}

fn default_sample_size() -> usize {
    25
}

fn default_min_age_secs() -> u64 {
    24 * 60 * 60
}

fn default_max_age_secs() -> u64 {
    2 * 24 * 60 * 60
}

fn default_validation_interval_secs() -> u64 {
    5 * 60 * 60
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            min_age_secs: default_min_age_secs(),
            max_age_secs: default_max_age_secs(),
            interval_secs: default_validation_interval_secs(),
        }
    }
}

impl ValidationConfig {
    pub fn min_age(&self) -> Duration {
        Duration::from_secs(self.min_age_secs)
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Configured endpoints, grouped by kind as they appear in the file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default)]
    pub share: Vec<ShareEndpoint>,
    #[serde(default)]
    pub object: Vec<ObjectEndpoint>,
}

impl EndpointConfig {
    pub fn all(&self) -> Vec<Endpoint> {
        self.object
            .iter()
            .cloned()
            .map(Endpoint::from)
            .chain(self.share.iter().cloned().map(Endpoint::from))
            .collect()
    }
}

/// Root of the daemon configuration file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub backups: BackupConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

impl DaemonConfig {
    /// Load the daemon configuration from `path`.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_native(),
            });
        }
        let config: DaemonConfig = ConfigStore::new().load(path)?;
        tracing::debug!(
            path = %path,
            pairs = config.backups.sync.len(),
            "Loaded daemon configuration"
        );
        Ok(config)
    }
}
