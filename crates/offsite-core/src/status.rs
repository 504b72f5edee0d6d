//! Service status reporting
//!
//! Each long-running loop publishes its state under a service name. Updates
//! merge into the previous status: fields left unset keep their old value.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Idle,
    Running,
    /// The last run completed but found problems
    Degraded,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceState::Idle => "idle",
            ServiceState::Running => "running",
            ServiceState::Degraded => "degraded",
        };
        f.write_str(name)
    }
}

/// A partial status change for one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUpdate {
    pub state: ServiceState,
    pub detail: Option<String>,
    pub next_run_at: Option<DateTime<Utc>>,
    pub last_run_at: Option<DateTime<Utc>>,
}

impl ServiceUpdate {
    pub fn new(state: ServiceState) -> Self {
        Self {
            state,
            detail: None,
            next_run_at: None,
            last_run_at: None,
        }
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn next_run_at(mut self, at: DateTime<Utc>) -> Self {
        self.next_run_at = Some(at);
        self
    }

    /// Schedule the next run `interval` after `from`.
    ///
    /// An interval past the representable range leaves the next run unset.
    pub fn next_run_in(mut self, from: DateTime<Utc>, interval: Duration) -> Self {
        let next = TimeDelta::from_std(interval)
            .ok()
            .and_then(|delta| from.checked_add_signed(delta));
        if next.is_none() {
            tracing::warn!(interval_secs = interval.as_secs(), "Next run time out of range");
        }
        self.next_run_at = next;
        self
    }

    pub fn last_run_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_run_at = Some(at);
        self
    }
}

/// Current status of one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatus {
    pub name: String,
    pub state: ServiceState,
    pub detail: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub next_run_at: Option<DateTime<Utc>>,
    pub last_run_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait StatusSink: Send + Sync {
    async fn update_service(&self, name: &str, update: ServiceUpdate);
}

/// In-memory status table shared by the running loops.
#[derive(Debug, Default)]
pub struct StatusBoard {
    services: Mutex<BTreeMap<String, ServiceStatus>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, name: &str) -> Option<ServiceStatus> {
        self.services.lock().await.get(name).cloned()
    }

    /// All services, ordered by name.
    pub async fn snapshot(&self) -> Vec<ServiceStatus> {
        self.services.lock().await.values().cloned().collect()
    }
}

#[async_trait]
impl StatusSink for StatusBoard {
    async fn update_service(&self, name: &str, update: ServiceUpdate) {
        let mut services = self.services.lock().await;
        let previous = services.get(name);

        let status = ServiceStatus {
            name: name.to_string(),
            state: update.state,
            detail: update
                .detail
                .or_else(|| previous.and_then(|p| p.detail.clone())),
            updated_at: Utc::now(),
            next_run_at: update
                .next_run_at
                .or_else(|| previous.and_then(|p| p.next_run_at)),
            last_run_at: update
                .last_run_at
                .or_else(|| previous.and_then(|p| p.last_run_at)),
        };

        tracing::debug!(service = name, state = %status.state, "Service status updated");
        services.insert(name.to_string(), status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_update_merges_unset_fields() {
        let board = StatusBoard::new();
        let next = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let last = Utc.with_ymd_and_hms(2025, 3, 1, 7, 0, 0).unwrap();

        board
            .update_service(
                "remote_validation",
                ServiceUpdate::new(ServiceState::Idle)
                    .detail("Waiting")
                    .next_run_at(next),
            )
            .await;
        board
            .update_service(
                "remote_validation",
                ServiceUpdate::new(ServiceState::Running).last_run_at(last),
            )
            .await;

        let status = board.get("remote_validation").await.unwrap();
        assert_eq!(status.state, ServiceState::Running);
        assert_eq!(status.detail.as_deref(), Some("Waiting"));
        assert_eq!(status.next_run_at, Some(next));
        assert_eq!(status.last_run_at, Some(last));
    }

    #[test]
    fn test_next_run_in() {
        let from = Utc.with_ymd_and_hms(2025, 3, 1, 7, 0, 0).unwrap();
        let update = ServiceUpdate::new(ServiceState::Idle)
            .next_run_in(from, Duration::from_secs(5 * 60 * 60));
        assert_eq!(
            update.next_run_at,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_next_run_in_out_of_range_is_unset() {
        let from = Utc.with_ymd_and_hms(2025, 3, 1, 7, 0, 0).unwrap();
        for secs in [10_000_000_000_000, u64::MAX] {
            let update = ServiceUpdate::new(ServiceState::Idle)
                .next_run_in(from, Duration::from_secs(secs));
            assert_eq!(update.next_run_at, None);
        }
    }

    #[tokio::test]
    async fn test_snapshot_is_ordered_by_name() {
        let board = StatusBoard::new();
        board
            .update_service("remote_validation", ServiceUpdate::new(ServiceState::Idle))
            .await;
        board
            .update_service("remote_sync", ServiceUpdate::new(ServiceState::Running))
            .await;

        let names: Vec<_> = board.snapshot().await.into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["remote_sync", "remote_validation"]);
    }
}
