//! Typed file locations and their canonical URI form
//!
//! Every location is written as a URI whose scheme carries the endpoint
//! nickname, followed by the path inside that endpoint:
//!
//! - `share:<nickname>://<drive>/<path...>`
//! - `object:<nickname>://<bucket>/<key...>`
//! - `local://<absolute path>`
//!
//! Parsing and [`Display`](fmt::Display) are exact inverses, so a location
//! can be stored back into configuration without changing its text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The kind of storage a location points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
    Share,
    Object,
    Local,
}

impl LocationKind {
    pub fn scheme(&self) -> &'static str {
        match self {
            LocationKind::Share => "share",
            LocationKind::Object => "object",
            LocationKind::Local => "local",
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

/// A path on a network share endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SharePath {
    pub endpoint: String,
    pub drive: String,
    /// Path below the drive; empty for the drive root.
    pub path: String,
}

/// An object (or key prefix) inside a bucket on an object-store endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectPath {
    pub endpoint: String,
    pub bucket: String,
    pub key: String,
}

/// An absolute path on the local filesystem. No endpoint is involved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalPath {
    pub path: String,
}

/// A parsed location, tied to an endpoint nickname unless it is local.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FileLocation {
    Share(SharePath),
    Object(ObjectPath),
    Local(LocalPath),
}

impl FileLocation {
    pub fn parse(uri: &str) -> Result<Self> {
        if let Some(path) = uri.strip_prefix("local://") {
            if !path.starts_with('/') {
                return Err(Error::invalid_location(
                    uri,
                    "local URI must be local://<absolute path>",
                ));
            }
            return Ok(FileLocation::Local(LocalPath {
                path: path.to_string(),
            }));
        }

        let (scheme, _) = uri
            .split_once(':')
            .ok_or_else(|| Error::invalid_location(uri, "missing URI scheme"))?;

        match scheme {
            "share" => {
                let (endpoint, drive, path) = split_endpoint_uri(uri, scheme)?;
                Ok(FileLocation::Share(SharePath {
                    endpoint,
                    drive,
                    path,
                }))
            }
            "object" => {
                let (endpoint, bucket, key) = split_endpoint_uri(uri, scheme)?;
                Ok(FileLocation::Object(ObjectPath {
                    endpoint,
                    bucket,
                    key,
                }))
            }
            "local" => Err(Error::invalid_location(
                uri,
                "local URI must be local://<absolute path>",
            )),
            other => Err(Error::invalid_location(
                uri,
                format!("unsupported URI scheme '{}'", other),
            )),
        }
    }

    pub fn kind(&self) -> LocationKind {
        match self {
            FileLocation::Share(_) => LocationKind::Share,
            FileLocation::Object(_) => LocationKind::Object,
            FileLocation::Local(_) => LocationKind::Local,
        }
    }

    /// Nickname of the endpoint this location routes through, if any.
    pub fn endpoint_nickname(&self) -> Option<&str> {
        match self {
            FileLocation::Share(share) => Some(&share.endpoint),
            FileLocation::Object(object) => Some(&object.endpoint),
            FileLocation::Local(_) => None,
        }
    }

    /// The share- or bucket-relative portion used to address the engine.
    pub fn full_path(&self) -> String {
        match self {
            FileLocation::Share(share) => format!("{}/{}", share.drive, share.path),
            FileLocation::Object(object) => format!("{}/{}", object.bucket, object.key),
            FileLocation::Local(local) => local.path.clone(),
        }
    }

    /// Address understood by the transfer engine.
    ///
    /// Endpoint locations are prefixed with the remote name; local paths are
    /// passed through bare since they need no credential routing.
    pub fn engine_address(&self) -> String {
        match self.endpoint_nickname() {
            Some(nickname) => format!("{}:{}", nickname, self.full_path()),
            None => self.full_path(),
        }
    }
}

/// Split `scheme:endpoint://first/rest` into `(endpoint, first, rest)`.
fn split_endpoint_uri(uri: &str, scheme: &str) -> Result<(String, String, String)> {
    let usage = || {
        Error::invalid_location(
            uri,
            format!("URI must be in format {}:<endpoint>://<root>/<path>", scheme),
        )
    };

    let rest = &uri[scheme.len() + 1..];
    let (endpoint, path) = rest.split_once("://").ok_or_else(usage)?;
    if endpoint.is_empty() || endpoint.contains(['/', ':']) {
        return Err(usage());
    }

    let (first, second) = path.split_once('/').ok_or_else(usage)?;
    if first.trim().is_empty() {
        return Err(usage());
    }

    Ok((endpoint.to_string(), first.to_string(), second.to_string()))
}

impl fmt::Display for FileLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileLocation::Share(share) => {
                write!(f, "share:{}://{}/{}", share.endpoint, share.drive, share.path)
            }
            FileLocation::Object(object) => {
                write!(f, "object:{}://{}/{}", object.endpoint, object.bucket, object.key)
            }
            FileLocation::Local(local) => write!(f, "local://{}", local.path),
        }
    }
}

impl FromStr for FileLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FileLocation {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<FileLocation> for String {
    fn from(location: FileLocation) -> Self {
        location.to_string()
    }
}
