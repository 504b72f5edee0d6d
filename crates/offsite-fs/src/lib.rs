//! Filesystem primitives for offsite
//!
//! Provides normalized path handling, atomic writes for generated
//! configuration files, and format-agnostic loading of the daemon config.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::{NormalizedPath, expand_home};
