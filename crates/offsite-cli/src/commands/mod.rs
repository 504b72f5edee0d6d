//! Command implementations

mod check;
mod run;
mod sync;
mod validate;
mod write_config;

pub use check::run_check;
pub use run::run_daemon;
pub use sync::run_sync;
pub use validate::run_validate;
pub use write_config::run_write_config;
