//! Sampling-based backup validation
//!
//! Rather than re-reading a whole backup, each cycle picks a uniform sample
//! of recently written source files per pair and reads the first record of
//! each back from the destination.

mod collect;
mod reservoir;
mod sampler;

pub use collect::{Candidate, build_object_path, collect_candidates, sample_listing, scan_local};
pub use reservoir::Reservoir;
pub use sampler::{
    PairValidation, SamplerSettings, VALIDATION_SERVICE, ValidationReport, ValidationSampler,
};
