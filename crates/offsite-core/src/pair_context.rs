//! Scoped resolution of a sync pair into engine addresses

use offsite_meta::{EndpointRegistry, FileLocation, SyncPair};

use crate::error::{Error, Result};

/// A location resolved to the address the engine understands.
///
/// Released when dropped.
#[derive(Debug)]
pub struct ResolvedLocation {
    location: FileLocation,
    address: String,
}

impl ResolvedLocation {
    /// Resolve `location` against the registry.
    ///
    /// Share and object locations need an endpoint that accepts them; local
    /// paths resolve to the bare filesystem path.
    pub fn resolve(location: &FileLocation, registry: &EndpointRegistry) -> Result<Self> {
        if let Some(nickname) = location.endpoint_nickname() {
            let accepted = registry
                .get(nickname)
                .is_some_and(|endpoint| endpoint.validates(location));
            if !accepted {
                return Err(Error::EndpointNotFound {
                    nickname: nickname.to_string(),
                });
            }
        }

        let address = location.engine_address();
        tracing::trace!(location = %location, address = %address, "Resolved location");
        Ok(Self {
            location: location.clone(),
            address,
        })
    }

    pub fn location(&self) -> &FileLocation {
        &self.location
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Drop for ResolvedLocation {
    fn drop(&mut self) {
        tracing::trace!(address = %self.address, "Released location");
    }
}

/// Both ends of a pair, acquired together.
///
/// Fields drop in declaration order, so the destination is released before
/// the source on every exit path.
#[derive(Debug)]
pub struct PairContext {
    dst: ResolvedLocation,
    src: ResolvedLocation,
}

impl PairContext {
    pub fn enter(pair: &SyncPair, registry: &EndpointRegistry) -> Result<Self> {
        let src = ResolvedLocation::resolve(&pair.src, registry)?;
        let dst = ResolvedLocation::resolve(&pair.dst, registry)?;
        Ok(Self { dst, src })
    }

    pub fn src(&self) -> &ResolvedLocation {
        &self.src
    }

    pub fn dst(&self) -> &ResolvedLocation {
        &self.dst
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offsite_meta::{Endpoint, ObjectEndpoint, Secret, validate_endpoints};

    fn registry() -> EndpointRegistry {
        validate_endpoints([Endpoint::Object(ObjectEndpoint {
            nickname: "b2".into(),
            key_id: "id".into(),
            application_key: Secret::new("key"),
            encrypt_key: None,
        })])
        .unwrap()
    }

    fn pair(src: &str, dst: &str) -> SyncPair {
        SyncPair {
            src: src.parse().unwrap(),
            dst: dst.parse().unwrap(),
        }
    }

    #[test]
    fn test_enter_resolves_both_ends() {
        let ctx = PairContext::enter(
            &pair("local:///srv/photos", "object:b2://backup/photos"),
            &registry(),
        )
        .unwrap();
        assert_eq!(ctx.src().address(), "/srv/photos");
        assert_eq!(ctx.dst().address(), "b2:backup/photos");
    }

    #[test]
    fn test_enter_fails_on_unknown_endpoint() {
        let err = PairContext::enter(
            &pair("local:///srv/photos", "object:wasabi://backup/photos"),
            &registry(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::EndpointNotFound { nickname } if nickname == "wasabi"));
    }

    #[test]
    fn test_enter_fails_on_kind_mismatch() {
        let err = PairContext::enter(
            &pair("share:b2://photos/library", "local:///mnt/backup"),
            &registry(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::EndpointNotFound { .. }));
    }
}
