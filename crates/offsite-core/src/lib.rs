//! Core orchestration layer for offsite
//!
//! This crate ties the endpoint registry and the transfer engine together:
//!
//! - [`ConfigWriter`] renders the engine config from configured endpoints
//! - [`SyncOrchestrator`] syncs every pair on each cycle, isolating failures
//! - [`ValidationSampler`] spot-checks recent backups by reading them back
//! - [`Scheduler`] repeats a [`Cycle`] until its shutdown token is cancelled
//!
//! Alerts and service status go through the [`AlertSink`] and [`StatusSink`]
//! handles passed in at construction.

pub mod alert;
pub mod config_writer;
pub mod error;
pub mod pair_context;
pub mod remote;
pub mod schedule;
pub mod status;
pub mod sync;
pub mod validation;

pub use alert::{AlertSink, LogAlertSink, StatusHandle};
pub use config_writer::ConfigWriter;
pub use error::{Error, Result};
pub use pair_context::{PairContext, ResolvedLocation};
pub use remote::{EncryptedRemote, ObjectRemote, RemoteDefinition, RemoteKind, ShareRemote};
pub use schedule::{Cycle, Scheduler};
pub use status::{ServiceState, ServiceStatus, ServiceUpdate, StatusBoard, StatusSink};
pub use sync::{SYNC_SERVICE, SyncOrchestrator, SyncReport};
pub use validation::{
    PairValidation, Reservoir, SamplerSettings, VALIDATION_SERVICE, ValidationReport,
    ValidationSampler,
};

pub use tokio_util::sync::CancellationToken;
