//! Endpoint registry, file locations, and daemon configuration for offsite.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod location;
pub mod secret;
pub mod validation;

pub use config::{
    BackupConfig, DaemonConfig, EndpointConfig, EngineConfig, SyncPair, ValidationConfig,
};
pub use endpoint::{Endpoint, EndpointRegistry, ObjectEndpoint, ShareEndpoint, validate_endpoints};
pub use error::{Error, Result};
pub use location::{FileLocation, LocalPath, LocationKind, ObjectPath, SharePath};
pub use secret::Secret;
pub use validation::validate_config;
