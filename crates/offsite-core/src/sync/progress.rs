//! Turns raw engine output into progress text

use std::collections::VecDeque;

use offsite_engine::{OutputLine, TransferStatus};

/// Tracks one sync invocation's output.
///
/// Each line becomes either a progress update or a diagnostic, and the most
/// recent lines are kept for failure reports.
#[derive(Debug)]
pub struct ProgressTracker {
    prefix: String,
    tail: VecDeque<String>,
    tail_limit: usize,
    last_status: Option<TransferStatus>,
}

impl ProgressTracker {
    pub fn new(src: &str, dst: &str, tail_limit: usize) -> Self {
        Self {
            prefix: format!("{} → {}", src, dst),
            tail: VecDeque::with_capacity(tail_limit),
            tail_limit,
            last_status: None,
        }
    }

    /// Record one line and return the status text it produces, if any.
    pub fn observe(&mut self, line: &OutputLine) -> Option<String> {
        let text = line.text.trim();
        if text.is_empty() {
            return None;
        }
        self.remember(text);

        match TransferStatus::parse(text) {
            Ok(status) => {
                let update = format!("{}: {}", self.prefix, status.stats.summary());
                tracing::debug!(progress = %update, "Sync progress");
                self.last_status = Some(status);
                Some(update)
            }
            Err(e) => {
                tracing::warn!(stream = ?line.stream, line = text, error = %e, "Unparsed engine output");
                Some(format!("{}: {}", self.prefix, text))
            }
        }
    }

    /// Most recent successfully parsed stats record
    pub fn last_status(&self) -> Option<&TransferStatus> {
        self.last_status.as_ref()
    }

    /// Retained output, oldest first, newline separated.
    pub fn tail(&self) -> String {
        self.tail.iter().cloned().collect::<Vec<_>>().join("\n")
    }

    fn remember(&mut self, text: &str) {
        if self.tail_limit == 0 {
            return;
        }
        if self.tail.len() == self.tail_limit {
            self.tail.pop_front();
        }
        self.tail.push_back(text.to_string());
    }
}
