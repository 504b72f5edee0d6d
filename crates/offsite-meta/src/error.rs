//! Error types for offsite-meta
//!
//! Every variant here is a configuration error: it is raised while loading
//! or validating configuration, before any transfer is attempted.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] offsite_fs::Error),

    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Duplicate endpoint nickname detected: '{nickname}'")]
    DuplicateEndpoint { nickname: String },

    #[error("File location {location} does not match any configured {kind} endpoint nickname")]
    UnknownEndpoint { location: String, kind: String },

    #[error("Invalid location '{uri}': {reason}")]
    InvalidLocation { uri: String, reason: String },
}

impl Error {
    pub(crate) fn invalid_location(uri: &str, reason: impl Into<String>) -> Self {
        Self::InvalidLocation {
            uri: uri.to_string(),
            reason: reason.into(),
        }
    }
}
