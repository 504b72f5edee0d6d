//! Error types for transfer engine operations

/// Errors that can occur while driving the transfer engine
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The engine process could not be started or waited on
    #[error("Failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Subprocess exited with non-zero status
    #[error("{command} failed (exit code {code}): {output}")]
    CommandFailed {
        command: String,
        code: i32,
        /// Captured stderr, or stdout when stderr was empty
        output: String,
    },

    /// A structured log line did not match the stats schema
    #[error("Failed to parse stats line: {message}")]
    StatsParse { line: String, message: String },

    /// Error parsing command output
    #[error("Failed to parse {command} output: {message}")]
    OutputParse { command: String, message: String },

    /// A pipe reader task stopped before reaching end of stream
    #[error("Output reader for {command} stopped: {message}")]
    Reader { command: String, message: String },
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;
