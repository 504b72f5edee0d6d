//! Startup validation of a loaded configuration
//!
//! Runs once before the engine config is written. Any error here is fatal.

use std::time::Duration;

use chrono::{TimeDelta, Utc};

use crate::config::DaemonConfig;
use crate::endpoint::{EndpointRegistry, validate_endpoints};
use crate::error::{Error, Result};
use crate::location::FileLocation;

/// Validate `config` and return the endpoint registry it describes.
///
/// Checks, in order:
/// - endpoint nicknames are unique across all kinds
/// - every endpoint location used by a sync pair names a configured
///   endpoint of the matching kind
/// - the validation sampler settings are usable
/// - both loop intervals yield a representable next-run time
pub fn validate_config(config: &DaemonConfig) -> Result<EndpointRegistry> {
    let registry = validate_endpoints(config.endpoints.all())?;

    for pair in &config.backups.sync {
        check_location(&registry, &pair.src)?;
        check_location(&registry, &pair.dst)?;
    }

    let validation = &config.validation;
    if validation.sample_size == 0 {
        return Err(Error::InvalidConfig {
            message: "validation.sample_size must be greater than zero".into(),
        });
    }
    if validation.min_age_secs > validation.max_age_secs {
        return Err(Error::InvalidConfig {
            message: format!(
                "validation.min_age_secs ({}) exceeds validation.max_age_secs ({})",
                validation.min_age_secs, validation.max_age_secs
            ),
        });
    }

    check_interval("backups.interval_secs", config.backups.interval())?;
    check_interval("validation.interval_secs", validation.interval())?;

    Ok(registry)
}

fn check_interval(key: &str, interval: Duration) -> Result<()> {
    let representable = TimeDelta::from_std(interval)
        .ok()
        .and_then(|delta| Utc::now().checked_add_signed(delta))
        .is_some();
    if representable {
        return Ok(());
    }
    Err(Error::InvalidConfig {
        message: format!("{} ({}s) is out of range", key, interval.as_secs()),
    })
}

fn check_location(registry: &EndpointRegistry, location: &FileLocation) -> Result<()> {
    if location.endpoint_nickname().is_none() {
        return Ok(());
    }
    if registry.values().any(|endpoint| endpoint.validates(location)) {
        return Ok(());
    }
    Err(Error::UnknownEndpoint {
        location: location.to_string(),
        kind: location.kind().to_string(),
    })
}
