//! Structured stats lines emitted by the engine during a sync
//!
//! With `--use-json-log` the engine writes one JSON object per log record.
//! Records carrying a `stats` object are progress snapshots:
//!
//! ```json
//! {"time": "2025-01-01T12:00:00.123+00:00", "level": "notice", "msg": "...",
//!  "stats": {"bytes": 1024, "checks": 3, "deletedDirs": 0, "deletes": 0,
//!            "elapsedTime": 12.5, "errors": 0, "eta": 30, "fatalError": false,
//!            "renames": 0, "speed": 81.9, "totalBytes": 4096, "totalChecks": 3,
//!            "totalTransfers": 4, "transfers": 1}}
//! ```

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::error::{Error, Result};

/// One parsed progress record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransferStatus {
    pub time: DateTime<FixedOffset>,
    pub level: String,
    #[serde(rename = "msg")]
    pub message: String,
    pub stats: TransferStats,
}

/// Counters from a progress record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferStats {
    pub bytes: u64,
    pub checks: u64,
    pub deleted_dirs: u64,
    pub deletes: u64,
    /// Seconds since the sync started
    pub elapsed_time: f64,
    pub errors: u64,
    /// Seconds remaining, when the engine can estimate it
    pub eta: Option<u64>,
    pub fatal_error: bool,
    pub renames: u64,
    /// Bytes per second
    pub speed: f64,
    pub total_bytes: u64,
    pub total_checks: u64,
    pub total_transfers: u64,
    /// Completed file transfers
    #[serde(default)]
    pub transfers: u64,
}

impl TransferStatus {
    /// Parse one engine output line.
    ///
    /// Lines that are not JSON, or JSON records without a complete `stats`
    /// object, are reported as [`Error::StatsParse`].
    pub fn parse(line: &str) -> Result<Self> {
        serde_json::from_str(line.trim()).map_err(|e| Error::StatsParse {
            line: line.to_string(),
            message: e.to_string(),
        })
    }
}

impl TransferStats {
    /// Completed fraction of total bytes as a percentage.
    pub fn percent(&self) -> Option<f64> {
        if self.total_bytes == 0 {
            None
        } else {
            Some(self.bytes as f64 * 100.0 / self.total_bytes as f64)
        }
    }

    /// Human-readable progress, e.g.
    /// `1.5 GiB/3.0 GiB (50%), 12.0 MiB/s, ETA 2m 8s, 4 checks, 0 errors`.
    pub fn summary(&self) -> String {
        let percent = self
            .percent()
            .map(|p| format!(" ({:.0}%)", p))
            .unwrap_or_default();
        let eta = match self.eta {
            Some(secs) => format_duration(secs),
            None => "-".to_string(),
        };
        format!(
            "{}/{}{}, {}/s, ETA {}, {} checks, {} errors",
            human_bytes(self.bytes),
            human_bytes(self.total_bytes),
            percent,
            human_bytes(self.speed as u64),
            eta,
            self.checks,
            self.errors
        )
    }
}

/// Format a byte count with binary units.
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

fn format_duration(secs: u64) -> String {
    let (hours, rest) = (secs / 3600, secs % 3600);
    let (minutes, seconds) = (rest / 60, rest % 60);
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
