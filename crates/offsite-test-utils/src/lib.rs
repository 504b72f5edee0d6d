//! Shared test utilities for the offsite workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`engine`]: [`engine::FakeEngine`], a scripted transfer engine that
//!   records its calls
//! - [`alert`]: [`alert::RecordingAlertSink`] for asserting on alerts
//! - [`fixtures`]: endpoints, pairs, registries, and temp config files

pub mod alert;
pub mod engine;
pub mod fixtures;

pub use alert::{AlertEvent, RecordingAlertSink};
pub use engine::{EngineCall, FakeEngine, list_entry};
pub use fixtures::{TestConfig, object_endpoint, pair, registry, share_endpoint};
