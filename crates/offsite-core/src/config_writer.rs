//! Generates the transfer engine's config file from the endpoint registry

use offsite_engine::TransferEngine;
use offsite_fs::NormalizedPath;
use offsite_meta::{Endpoint, EndpointRegistry};

use crate::error::Result;
use crate::remote::{ObjectRemote, RemoteDefinition, ShareRemote};

/// Turns configured endpoints into engine remotes.
///
/// Secrets pass through the engine's own obscure transform. Endpoints with an
/// encryption key get their base remote renamed to `<nickname>-raw` and a
/// `crypt` remote named `<nickname>` wrapping it, so locations keep
/// addressing `<nickname>:` either way.
pub struct ConfigWriter<'a> {
    engine: &'a dyn TransferEngine,
}

impl<'a> ConfigWriter<'a> {
    pub fn new(engine: &'a dyn TransferEngine) -> Self {
        Self { engine }
    }

    /// Build every remote definition, in registry order.
    pub async fn build_remotes(&self, registry: &EndpointRegistry) -> Result<Vec<RemoteDefinition>> {
        let mut remotes = Vec::with_capacity(registry.len());

        for (nickname, endpoint) in registry {
            let base_name = match endpoint.encrypt_key() {
                Some(_) => format!("{}-raw", nickname),
                None => nickname.clone(),
            };

            let base = match endpoint {
                Endpoint::Share(share) => RemoteDefinition::share(
                    &base_name,
                    ShareRemote {
                        host: share.host.clone(),
                        user: share.username.clone(),
                        pass: self.engine.obscure(share.password.expose()).await?,
                        domain: share.domain.clone(),
                    },
                ),
                Endpoint::Object(object) => RemoteDefinition::object(
                    &base_name,
                    ObjectRemote {
                        account: object.key_id.clone(),
                        key: object.application_key.expose().to_string(),
                    },
                ),
            };
            remotes.push(base);

            if let Some(key) = endpoint.encrypt_key() {
                let password = self.engine.obscure(key.expose()).await?;
                remotes.push(RemoteDefinition::encrypted(nickname, &base_name, password));
            }
        }

        Ok(remotes)
    }

    /// Render the full config text. Fails before producing any text if a
    /// remote is invalid.
    pub async fn render(&self, registry: &EndpointRegistry) -> Result<String> {
        let remotes = self.build_remotes(registry).await?;
        for remote in &remotes {
            remote.validate()?;
        }
        Ok(remotes.iter().map(RemoteDefinition::render).collect())
    }

    /// Render and atomically write the config to `path`.
    pub async fn write(&self, registry: &EndpointRegistry, path: &NormalizedPath) -> Result<()> {
        let content = self.render(registry).await?;
        offsite_fs::io::write_text(path, &content)?;
        tracing::info!(path = %path.as_str(), remotes = registry.len(), "Engine config written");
        Ok(())
    }
}
