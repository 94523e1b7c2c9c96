//! Collaborators shared by the update commands.

use std::path::Path;

use crate::config::{ConfigStore, FileConfigStore, UpdateConfig};
use crate::shell::is_elevated;
use crate::updates::{
    detect_install_method, resolve_channel, DistTagSource, InstallMethod, RegistryClient,
    ReleaseChannel, UpdateChecker, UpdateExecutor, VERSION,
};

/// Resolves the effective channel from the persisted config.
pub type ChannelResolver = fn(Option<&UpdateConfig>) -> ReleaseChannel;

/// Everything the update commands talk to.
///
/// [`UpdateServices::system`] wires the real file store, registry, and
/// process executor; tests swap in memory-backed pieces.
pub struct UpdateServices {
    /// Persisted `update` config section.
    pub store: Box<dyn ConfigStore>,
    /// Registry dist-tag source.
    pub registry: Box<dyn DistTagSource>,
    /// Version of the running binary.
    pub current_version: String,
    /// Channel precedence rules.
    pub channel_resolver: ChannelResolver,
    /// Install method lookup, run only when an update is applied or shown.
    pub detect: fn() -> InstallMethod,
    /// Runs package-manager commands.
    pub executor: UpdateExecutor,
}

impl UpdateServices {
    /// Real services. `config_path` overrides the default config location.
    pub fn system(config_path: Option<&Path>) -> Self {
        let store = match config_path {
            Some(path) => FileConfigStore::new(path),
            None => FileConfigStore::at_default_location(),
        };
        tracing::debug!("Using config file {}", store.path().display());

        Self {
            store: Box::new(store),
            registry: Box::new(RegistryClient::from_env()),
            current_version: VERSION.to_string(),
            channel_resolver: resolve_channel,
            detect: detect_install_method,
            executor: UpdateExecutor::new().with_elevated(is_elevated()),
        }
    }

    /// Services around the given store and registry, with the real
    /// detector and executor.
    pub fn with_parts(store: Box<dyn ConfigStore>, registry: Box<dyn DistTagSource>) -> Self {
        Self {
            store,
            registry,
            current_version: VERSION.to_string(),
            channel_resolver: resolve_channel,
            detect: detect_install_method,
            executor: UpdateExecutor::new(),
        }
    }

    /// A checker bound to these services.
    pub fn checker(&self) -> UpdateChecker<'_> {
        UpdateChecker::new(self.store.as_ref(), self.registry.as_ref())
            .with_current_version(self.current_version.clone())
            .with_channel_resolver(self.channel_resolver)
    }

    /// Persist `channel` as the user's choice.
    pub fn save_channel(&self, channel: ReleaseChannel) -> crate::error::Result<()> {
        let config = self.store.load_update()?;
        self.store.save_update(&UpdateConfig {
            channel: Some(channel),
            ..config
        })
    }
}
