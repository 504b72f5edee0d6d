//! Endpoint, pair, and config-file fixtures.

use std::fs;

use offsite_meta::{
    Endpoint, EndpointRegistry, ObjectEndpoint, Secret, ShareEndpoint, SyncPair, validate_endpoints,
};
use tempfile::TempDir;

/// A share endpoint at `192.168.1.2` with no domain or encryption.
pub fn share_endpoint(nickname: &str) -> ShareEndpoint {
    ShareEndpoint {
        nickname: nickname.to_string(),
        host: "192.168.1.2".to_string(),
        username: "backup".to_string(),
        password: Secret::new("share-pass"),
        domain: None,
        encrypt_key: None,
    }
}

/// An object-store endpoint with no encryption.
pub fn object_endpoint(nickname: &str) -> ObjectEndpoint {
    ObjectEndpoint {
        nickname: nickname.to_string(),
        key_id: "key-id".to_string(),
        application_key: Secret::new("app-key"),
        encrypt_key: None,
    }
}

/// Build a registry, panicking on duplicate nicknames.
pub fn registry(endpoints: impl IntoIterator<Item = Endpoint>) -> EndpointRegistry {
    validate_endpoints(endpoints).expect("fixture endpoints must be unique")
}

/// Parse a pair from canonical location strings.
pub fn pair(src: &str, dst: &str) -> SyncPair {
    SyncPair {
        src: src.parse().expect("fixture src must parse"),
        dst: dst.parse().expect("fixture dst must parse"),
    }
}

/// A daemon config file written into a fresh temp directory.
pub struct TestConfig {
    dir: TempDir,
}

impl TestConfig {
    /// Write `content` as `config.toml`.
    pub fn new(content: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), content).unwrap();
        Self { dir }
    }

    pub fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }

    pub fn path(&self) -> std::path::PathBuf {
        self.dir.path().join("config.toml")
    }
}
