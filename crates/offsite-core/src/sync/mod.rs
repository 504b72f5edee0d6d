//! Sync orchestration
//!
//! - [`SyncOrchestrator`]: runs the engine once per pair per cycle
//! - [`ProgressTracker`]: parses streamed engine output into status text

mod orchestrator;
mod progress;

pub use orchestrator::{SYNC_SERVICE, SyncOrchestrator, SyncReport};
pub use progress::ProgressTracker;
