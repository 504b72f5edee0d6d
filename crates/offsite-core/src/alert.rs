//! Outbound alerts
//!
//! Alerts are the only failure signal a running daemon gives. Delivery is
//! best effort: implementations log their own failures and never hand them
//! back to a cycle.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

/// Identifies a status message that can be edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusHandle(pub String);

#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Post a standalone message.
    async fn send(&self, message: &str);

    /// Post a message that later updates will replace.
    async fn create_status(&self, message: &str) -> StatusHandle;

    /// Replace the text of a message created with [`AlertSink::create_status`].
    async fn update_status(&self, handle: &StatusHandle, message: &str);
}

/// Alert sink that only writes to the log.
#[derive(Debug, Default)]
pub struct LogAlertSink {
    next_id: AtomicU64,
}

impl LogAlertSink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlertSink for LogAlertSink {
    async fn send(&self, message: &str) {
        tracing::info!(target: "offsite::alert", "{}", message);
    }

    async fn create_status(&self, message: &str) -> StatusHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = StatusHandle(format!("status-{}", id));
        tracing::info!(target: "offsite::alert", status = %handle.0, "{}", message);
        handle
    }

    async fn update_status(&self, handle: &StatusHandle, message: &str) {
        tracing::debug!(target: "offsite::alert", status = %handle.0, "{}", message);
    }
}
