//! The transfer engine seam
//!
//! Everything that touches bytes goes through [`TransferEngine`]: syncing a
//! pair, listing recent files, reading back the head of a file, and
//! obscuring credentials for the generated config.

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::Result;
use crate::listing::{AgeWindow, ListEntry};

/// Which pipe a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// One line of engine output, without its trailing newline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub stream: OutputStream,
    pub text: String,
}

impl OutputLine {
    pub fn stdout(text: impl Into<String>) -> Self {
        Self {
            stream: OutputStream::Stdout,
            text: text.into(),
        }
    }

    pub fn stderr(text: impl Into<String>) -> Self {
        Self {
            stream: OutputStream::Stderr,
            text: text.into(),
        }
    }
}

/// How a sync invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code, or `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn failed(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Core trait for the external content-transfer engine
#[async_trait]
pub trait TransferEngine: Send + Sync {
    /// Apply the engine's reversible obscuring transform to a secret.
    async fn obscure(&self, secret: &str) -> Result<String>;

    /// Run a one-way sync from `src` to `dst`.
    ///
    /// Every output line is sent to `lines` as it is read. The call returns
    /// only after the process has exited and both pipes are drained; the
    /// sender is dropped on return so receivers see end-of-stream.
    async fn sync(
        &self,
        src: &str,
        dst: &str,
        lines: UnboundedSender<OutputLine>,
    ) -> Result<ExitOutcome>;

    /// Recursively list files (not directories) under `remote`, optionally
    /// restricted to an age window by the engine itself.
    async fn list_files(&self, remote: &str, window: Option<AgeWindow>) -> Result<Vec<ListEntry>>;

    /// Read the first record of `path` and return how many bytes came back.
    async fn read_head(&self, path: &str) -> Result<u64>;
}
