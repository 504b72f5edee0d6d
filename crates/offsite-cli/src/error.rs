//! Error types for offsite-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from offsite-core
    #[error(transparent)]
    Core(#[from] offsite_core::Error),

    /// Error from offsite-meta
    #[error(transparent)]
    Meta(#[from] offsite_meta::Error),

    /// Error from offsite-fs
    #[error(transparent)]
    Fs(#[from] offsite_fs::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
