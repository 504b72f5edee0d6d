//! Credentialed storage endpoints
//!
//! An endpoint is a storage location at the granularity of the credentials
//! needed to reach it. Locations refer to endpoints by nickname, so
//! nicknames must be unique across every endpoint kind.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::location::FileLocation;
use crate::secret::Secret;

/// A network file share (SMB).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareEndpoint {
    pub nickname: String,
    pub host: String,
    pub username: String,
    pub password: Secret,
    #[serde(default)]
    pub domain: Option<String>,
    /// Key used to encrypt data at rest on this endpoint.
    #[serde(default)]
    pub encrypt_key: Option<Secret>,
}

/// An object-store account (B2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectEndpoint {
    pub nickname: String,
    pub key_id: String,
    pub application_key: Secret,
    #[serde(default)]
    pub encrypt_key: Option<Secret>,
}

/// Any configured endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    Share(ShareEndpoint),
    Object(ObjectEndpoint),
}

impl Endpoint {
    pub fn nickname(&self) -> &str {
        match self {
            Endpoint::Share(share) => &share.nickname,
            Endpoint::Object(object) => &object.nickname,
        }
    }

    pub fn encrypt_key(&self) -> Option<&Secret> {
        match self {
            Endpoint::Share(share) => share.encrypt_key.as_ref(),
            Endpoint::Object(object) => object.encrypt_key.as_ref(),
        }
    }

    /// True iff `location` is of this endpoint's kind and names this endpoint.
    pub fn validates(&self, location: &FileLocation) -> bool {
        match (self, location) {
            (Endpoint::Share(endpoint), FileLocation::Share(path)) => {
                path.endpoint == endpoint.nickname
            }
            (Endpoint::Object(endpoint), FileLocation::Object(path)) => {
                path.endpoint == endpoint.nickname
            }
            _ => false,
        }
    }
}

impl From<ShareEndpoint> for Endpoint {
    fn from(endpoint: ShareEndpoint) -> Self {
        Endpoint::Share(endpoint)
    }
}

impl From<ObjectEndpoint> for Endpoint {
    fn from(endpoint: ObjectEndpoint) -> Self {
        Endpoint::Object(endpoint)
    }
}

/// Endpoints keyed by nickname, in nickname order.
pub type EndpointRegistry = BTreeMap<String, Endpoint>;

/// Build the nickname map, rejecting the first duplicate nickname.
pub fn validate_endpoints(endpoints: impl IntoIterator<Item = Endpoint>) -> Result<EndpointRegistry> {
    let mut by_nickname = EndpointRegistry::new();
    for endpoint in endpoints {
        let nickname = endpoint.nickname().to_string();
        if by_nickname.contains_key(&nickname) {
            return Err(Error::DuplicateEndpoint { nickname });
        }
        by_nickname.insert(nickname, endpoint);
    }
    Ok(by_nickname)
}
