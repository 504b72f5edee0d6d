//! Error types for offsite-core

/// Result type for offsite-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in offsite-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A remote definition failed validation before any config text was written
    #[error("Invalid remote '{name}': {reason}")]
    InvalidRemote { name: String, reason: String },

    /// A sync pair referenced an endpoint that is not in the registry
    #[error("No endpoint named '{nickname}' is configured")]
    EndpointNotFound { nickname: String },

    /// A sync invocation exited unsuccessfully
    #[error("Transfer failed for {pair} ({}):\n{output}", describe_exit(.code))]
    TransferFailed {
        pair: String,
        code: Option<i32>,
        output: String,
    },

    /// A spawned task panicked or was cancelled
    #[error("Task failed: {message}")]
    Task { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from offsite-fs
    #[error(transparent)]
    Fs(#[from] offsite_fs::Error),

    /// Metadata error from offsite-meta
    #[error(transparent)]
    Meta(#[from] offsite_meta::Error),

    /// Engine error from offsite-engine
    #[error(transparent)]
    Engine(#[from] offsite_engine::Error),
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Task {
            message: err.to_string(),
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}
