//! [`RecordingAlertSink`]: keeps every alert for later assertions.

use std::sync::Mutex;

use async_trait::async_trait;
use offsite_core::{AlertSink, StatusHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertEvent {
    Sent(String),
    StatusCreated { handle: StatusHandle, message: String },
    StatusUpdated { handle: StatusHandle, message: String },
}

#[derive(Debug, Default)]
pub struct RecordingAlertSink {
    events: Mutex<Vec<AlertEvent>>,
}

impl RecordingAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AlertEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Messages posted with `send`, in order.
    pub fn sent(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                AlertEvent::Sent(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Number of status messages created.
    pub fn statuses_created(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, AlertEvent::StatusCreated { .. }))
            .count()
    }

    /// Texts written into existing status messages, in order.
    pub fn status_updates(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                AlertEvent::StatusUpdated { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: AlertEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl AlertSink for RecordingAlertSink {
    async fn send(&self, message: &str) {
        self.push(AlertEvent::Sent(message.to_string()));
    }

    async fn create_status(&self, message: &str) -> StatusHandle {
        let handle = StatusHandle(format!("recorded-{}", self.statuses_created()));
        self.push(AlertEvent::StatusCreated {
            handle: handle.clone(),
            message: message.to_string(),
        });
        handle
    }

    async fn update_status(&self, handle: &StatusHandle, message: &str) {
        self.push(AlertEvent::StatusUpdated {
            handle: handle.clone(),
            message: message.to_string(),
        });
    }
}
