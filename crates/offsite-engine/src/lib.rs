//! Transfer engine integration for offsite
//!
//! This crate wraps the external content-transfer engine (rclone) behind the
//! [`TransferEngine`] trait. It handles:
//!
//! - Spawning sync invocations and streaming their output line by line
//! - Parsing structured stats lines into [`TransferStatus`]
//! - Recursive listings and minimal read-back of single files
//! - The engine's credential-obscuring transform

pub mod engine;
pub mod error;
pub mod listing;
pub mod rclone;
pub mod stats;

pub use engine::{ExitOutcome, OutputLine, OutputStream, TransferEngine};
pub use error::{Error, Result};
pub use listing::{AgeWindow, ListEntry};
pub use rclone::RcloneEngine;
pub use stats::{TransferStats, TransferStatus, human_bytes};
