//! Remote definitions in the transfer engine's native config format
//!
//! A [`RemoteDefinition`] mirrors one `[name]` section of the engine's
//! ini-like config. Definitions are built fresh from the endpoint registry on
//! every regeneration and only ever exist as text on disk.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Remote names end up as config section headers and address prefixes.
static REMOTE_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\-]+$").unwrap());

/// Network file share remote (`type = smb`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRemote {
    pub host: String,
    pub user: String,
    /// Obscured password
    pub pass: String,
    pub domain: Option<String>,
}

/// Object storage remote (`type = b2`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRemote {
    pub account: String,
    pub key: String,
}

/// Encryption wrapper around another remote (`type = crypt`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedRemote {
    /// Name of the wrapped remote, without the trailing colon
    pub remote: String,
    /// Obscured encryption password
    pub password: String,
    pub directory_name_encryption: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteKind {
    Share(ShareRemote),
    Object(ObjectRemote),
    Encrypted(EncryptedRemote),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDefinition {
    pub name: String,
    pub kind: RemoteKind,
}

impl RemoteDefinition {
    pub fn share(name: impl Into<String>, remote: ShareRemote) -> Self {
        Self {
            name: name.into(),
            kind: RemoteKind::Share(remote),
        }
    }

    pub fn object(name: impl Into<String>, remote: ObjectRemote) -> Self {
        Self {
            name: name.into(),
            kind: RemoteKind::Object(remote),
        }
    }

    /// Wrap `inner` with at-rest encryption.
    ///
    /// Directory name encryption stays off: the wrapper would otherwise
    /// rename bucket and share paths that locations address directly.
    pub fn encrypted(name: impl Into<String>, inner: &str, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: RemoteKind::Encrypted(EncryptedRemote {
                remote: inner.to_string(),
                password: password.into(),
                directory_name_encryption: false,
            }),
        }
    }

    /// The engine's backend type for this remote.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            RemoteKind::Share(_) => "smb",
            RemoteKind::Object(_) => "b2",
            RemoteKind::Encrypted(_) => "crypt",
        }
    }

    /// Section fields in output order, `type` first.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("type", self.type_name().to_string())];
        match &self.kind {
            RemoteKind::Share(share) => {
                fields.push(("host", share.host.clone()));
                fields.push(("user", share.user.clone()));
                fields.push(("pass", share.pass.clone()));
                if let Some(domain) = &share.domain {
                    fields.push(("domain", domain.clone()));
                }
            }
            RemoteKind::Object(object) => {
                fields.push(("account", object.account.clone()));
                fields.push(("key", object.key.clone()));
            }
            RemoteKind::Encrypted(crypt) => {
                fields.push(("remote", format!("{}:", crypt.remote)));
                fields.push(("password", crypt.password.clone()));
                fields.push((
                    "directory_name_encryption",
                    crypt.directory_name_encryption.to_string(),
                ));
            }
        }
        fields
    }

    /// Check that every field the engine needs is present and well-formed.
    pub fn validate(&self) -> Result<()> {
        if !REMOTE_NAME.is_match(&self.name) {
            return Err(self.invalid("name may only contain letters, digits, '_' and '-'"));
        }

        match &self.kind {
            RemoteKind::Share(share) => {
                if share.host.trim().is_empty() {
                    return Err(self.invalid("share remote must include 'host'"));
                }
                if share.user.is_empty() {
                    return Err(self.invalid("share remote must include 'user'"));
                }
            }
            RemoteKind::Object(object) => {
                if object.account.is_empty() {
                    return Err(self.invalid("object remote must include 'account'"));
                }
                if object.key.is_empty() {
                    return Err(self.invalid("object remote must include 'key'"));
                }
            }
            RemoteKind::Encrypted(crypt) => {
                if !REMOTE_NAME.is_match(&crypt.remote) {
                    return Err(self.invalid("encrypted remote must wrap a valid remote name"));
                }
                if crypt.password.is_empty() {
                    return Err(self.invalid("encrypted remote must include 'password'"));
                }
            }
        }
        Ok(())
    }

    /// Render as a `[name]` section followed by a blank line.
    pub fn render(&self) -> String {
        let mut out = format!("[{}]\n", self.name);
        for (key, value) in self.fields() {
            let _ = writeln!(out, "{} = {}", key, value);
        }
        out.push('\n');
        out
    }

    fn invalid(&self, reason: &str) -> Error {
        Error::InvalidRemote {
            name: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}
