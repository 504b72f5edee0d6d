//! rclone subprocess implementation of [`TransferEngine`]

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use offsite_fs::NormalizedPath;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;

use crate::engine::{ExitOutcome, OutputLine, OutputStream, TransferEngine};
use crate::error::{Error, Result};
use crate::listing::{AgeWindow, ListEntry};

/// Drives the `rclone` binary against a generated config file.
#[derive(Debug, Clone)]
pub struct RcloneEngine {
    binary: PathBuf,
    config_path: NormalizedPath,
    stats_interval: Duration,
}

impl RcloneEngine {
    pub fn new(binary: impl Into<PathBuf>, config_path: NormalizedPath) -> Self {
        Self {
            binary: binary.into(),
            config_path,
            stats_interval: Duration::from_secs(30),
        }
    }

    pub fn with_stats_interval(mut self, stats_interval: Duration) -> Self {
        self.stats_interval = stats_interval;
        self
    }

    pub fn config_path(&self) -> &NormalizedPath {
        &self.config_path
    }

    /// Arguments for a one-way sync with periodic JSON stats records.
    pub fn sync_args(&self, src: &str, dst: &str) -> Vec<String> {
        vec![
            "sync".into(),
            "--config".into(),
            self.config_path.as_str().into(),
            src.into(),
            dst.into(),
            "--use-json-log".into(),
            "--stats".into(),
            format!("{}s", self.stats_interval.as_secs().max(1)),
            "--stats-log-level".into(),
            "NOTICE".into(),
            "--log-format".into(),
            "date,time".into(),
        ]
    }

    /// Arguments for a recursive files-only listing.
    pub fn list_args(&self, remote: &str, window: Option<AgeWindow>) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "lsjson".into(),
            "--recursive".into(),
            "--files-only".into(),
            "--fast-list".into(),
            "--config".into(),
            self.config_path.as_str().into(),
        ];
        if let Some(window) = window {
            args.extend([
                "--min-age".into(),
                format!("{}s", window.min.as_secs()),
                "--max-age".into(),
                format!("{}s", window.max.as_secs()),
            ]);
        }
        args.push(remote.into());
        args
    }

    /// Arguments for reading the first record of one file.
    pub fn read_args(&self, path: &str) -> Vec<String> {
        vec![
            "cat".into(),
            "--count".into(),
            "1".into(),
            "--config".into(),
            self.config_path.as_str().into(),
            path.into(),
        ]
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);
        cmd
    }

    fn label(&self, subcommand: &str) -> String {
        format!("{} {}", self.binary.display(), subcommand)
    }

    /// Run to completion, returning stdout or a `CommandFailed` error.
    async fn run_captured(&self, subcommand: &str, args: &[String]) -> Result<Vec<u8>> {
        let command = self.label(subcommand);
        tracing::debug!(command = %command, "Running engine command");

        let output = self
            .command(args)
            .output()
            .await
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(Error::CommandFailed {
                command,
                code: output.status.code().unwrap_or(-1),
                output: failure_output(&output.stdout, &output.stderr),
            })
        }
    }
}

#[async_trait]
impl TransferEngine for RcloneEngine {
    async fn obscure(&self, secret: &str) -> Result<String> {
        let command = self.label("obscure");

        // Read the secret from stdin so it never shows up in the process list
        let mut child = Command::new(&self.binary)
            .args(["obscure", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(secret.as_bytes())
                .await
                .map_err(|source| Error::Spawn {
                    command: command.clone(),
                    source,
                })?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command,
                code: output.status.code().unwrap_or(-1),
                output: failure_output(&output.stdout, &output.stderr),
            });
        }

        let obscured = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if obscured.is_empty() {
            return Err(Error::OutputParse {
                command,
                message: "empty output".into(),
            });
        }
        Ok(obscured)
    }

    async fn sync(
        &self,
        src: &str,
        dst: &str,
        lines: UnboundedSender<OutputLine>,
    ) -> Result<ExitOutcome> {
        let command = self.label("sync");
        tracing::info!(src, dst, "Starting engine sync");

        let mut child = self
            .command(&self.sync_args(src, dst))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout_reader = tokio::spawn(forward_lines(stdout, OutputStream::Stdout, lines.clone()));
        let stderr_reader = tokio::spawn(forward_lines(stderr, OutputStream::Stderr, lines));

        let status = child.wait().await.map_err(|source| Error::Spawn {
            command: command.clone(),
            source,
        })?;

        // The child may exit with output still buffered in the pipes
        for reader in [stdout_reader, stderr_reader] {
            reader
                .await
                .map_err(|e| Error::Reader {
                    command: command.clone(),
                    message: e.to_string(),
                })?
                .map_err(|e| Error::Reader {
                    command: command.clone(),
                    message: e.to_string(),
                })?;
        }

        tracing::debug!(src, dst, code = ?status.code(), "Engine sync exited");
        Ok(ExitOutcome {
            code: status.code(),
        })
    }

    async fn list_files(&self, remote: &str, window: Option<AgeWindow>) -> Result<Vec<ListEntry>> {
        let stdout = self
            .run_captured("lsjson", &self.list_args(remote, window))
            .await?;

        let text = String::from_utf8_lossy(&stdout);
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let entries: Vec<ListEntry> =
            serde_json::from_str(&text).map_err(|e| Error::OutputParse {
                command: self.label("lsjson"),
                message: e.to_string(),
            })?;
        Ok(entries.into_iter().filter(|entry| !entry.is_dir).collect())
    }

    async fn read_head(&self, path: &str) -> Result<u64> {
        let stdout = self.run_captured("cat", &self.read_args(path)).await?;
        Ok(stdout.len() as u64)
    }
}

/// Forward each line of `reader` to `lines` until end of stream.
async fn forward_lines<R>(
    reader: Option<R>,
    stream: OutputStream,
    lines: UnboundedSender<OutputLine>,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return Ok(());
    };

    let mut segments = BufReader::new(reader).split(b'\n');
    while let Some(segment) = segments.next_segment().await? {
        let text = String::from_utf8_lossy(&segment);
        let text = text.trim_end_matches('\r').to_string();
        // A closed receiver only means nobody is watching progress
        let _ = lines.send(OutputLine { stream, text });
    }
    Ok(())
}

fn failure_output(stdout: &[u8], stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    if stderr.trim().is_empty() {
        String::from_utf8_lossy(stdout).trim().to_string()
    } else {
        stderr.trim().to_string()
    }
}
