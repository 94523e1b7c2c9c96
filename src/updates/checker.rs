//! Update availability checks.
//!
//! [`UpdateChecker`] ties together channel resolution, the interval-based
//! cache gate, the registry lookup and version comparison. It never returns
//! an error: failures are reported through [`UpdateCheckResult::error`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

use super::channel::{resolve_channel, ReleaseChannel};
use super::registry::{Deadline, DistTagSource, DistTags};
use super::version::{compare_versions, VERSION};
use crate::config::{ConfigStore, UpdateConfig};

/// Error text when the registry cannot be reached or answers garbage.
pub const NETWORK_ERROR: &str =
    "Unable to reach the npm registry. Check your network connection and try again.";

/// Outcome of a single update check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCheckResult {
    /// Whether the channel carries a newer version than the running one.
    pub update_available: bool,
    /// Version of the running binary.
    pub current_version: String,
    /// Newest version on the channel; `None` whenever `error` is set.
    pub latest_version: Option<String>,
    /// Channel that was checked.
    pub channel: ReleaseChannel,
    /// Registry dist-tag for `channel`.
    pub dist_tag: String,
    /// True when answered from the persisted cache without a network call.
    pub cached: bool,
    /// Human-readable failure description.
    pub error: Option<String>,
}

impl UpdateCheckResult {
    fn failed(
        current_version: &str,
        channel: ReleaseChannel,
        error: impl Into<String>,
    ) -> Self {
        Self {
            update_available: false,
            current_version: current_version.to_string(),
            latest_version: None,
            channel,
            dist_tag: channel.dist_tag().to_string(),
            cached: false,
            error: Some(error.into()),
        }
    }
}

/// Latest published version per channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChannelVersions {
    pub stable: Option<String>,
    pub beta: Option<String>,
    pub nightly: Option<String>,
}

impl ChannelVersions {
    fn from_tags(tags: &DistTags) -> Self {
        let lookup = |channel: ReleaseChannel| tags.get(channel.dist_tag()).cloned();
        Self {
            stable: lookup(ReleaseChannel::Stable),
            beta: lookup(ReleaseChannel::Beta),
            nightly: lookup(ReleaseChannel::Nightly),
        }
    }

    /// Version for one channel.
    pub fn get(&self, channel: ReleaseChannel) -> Option<&str> {
        match channel {
            ReleaseChannel::Stable => self.stable.as_deref(),
            ReleaseChannel::Beta => self.beta.as_deref(),
            ReleaseChannel::Nightly => self.nightly.as_deref(),
        }
    }
}

/// Message for a channel whose dist-tag is absent from the registry.
pub fn unpublished_channel_error(channel: ReleaseChannel) -> String {
    format!(
        "Release channel \"{}\" does not have any published releases (dist-tag \"{}\")",
        channel,
        channel.dist_tag()
    )
}

fn is_update(current: &str, latest: &str) -> bool {
    compare_versions(current, latest) == Some(Ordering::Less)
}

/// Checks the registry for newer releases on the configured channel.
///
/// The config store is read and then written without locking; see
/// [`crate::config::store`].
pub struct UpdateChecker<'a> {
    store: &'a dyn ConfigStore,
    registry: &'a dyn DistTagSource,
    current_version: String,
    channel_resolver: Box<dyn Fn(Option<&UpdateConfig>) -> ReleaseChannel + 'a>,
    deadline: Option<Deadline>,
}

impl<'a> UpdateChecker<'a> {
    /// Checker for the running binary.
    pub fn new(store: &'a dyn ConfigStore, registry: &'a dyn DistTagSource) -> Self {
        Self {
            store,
            registry,
            current_version: VERSION.to_string(),
            channel_resolver: Box::new(resolve_channel),
            deadline: None,
        }
    }

    /// Pretend to be a different running version.
    pub fn with_current_version(mut self, version: impl Into<String>) -> Self {
        self.current_version = version.into();
        self
    }

    /// Replace environment-based channel resolution.
    pub fn with_channel_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(Option<&UpdateConfig>) -> ReleaseChannel + 'a,
    {
        self.channel_resolver = Box::new(resolver);
        self
    }

    /// Cap registry calls at an outer deadline in addition to the 8s default.
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Version the checker compares against.
    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    fn load_config(&self) -> UpdateConfig {
        self.store.load_update().unwrap_or_else(|e| {
            tracing::debug!("Ignoring unreadable update config: {}", e);
            UpdateConfig::default()
        })
    }

    fn fetch_tags(&self) -> Option<DistTags> {
        let deadline = match self.deadline {
            Some(outer) => Deadline::registry_default().earliest(outer),
            None => Deadline::registry_default(),
        };
        self.registry.fetch_dist_tags(&deadline)
    }

    /// Channel that a check would use right now.
    pub fn effective_channel(&self) -> ReleaseChannel {
        let config = self.load_config();
        (self.channel_resolver)(Some(&config))
    }

    /// Check for an update. `force` bypasses the interval cache.
    pub fn check(&self, force: bool) -> UpdateCheckResult {
        self.check_at(force, Utc::now())
    }

    /// [`check`](Self::check) with an explicit clock.
    pub fn check_at(&self, force: bool, now: DateTime<Utc>) -> UpdateCheckResult {
        let config = self.load_config();
        let channel = (self.channel_resolver)(Some(&config));
        let dist_tag = channel.dist_tag();

        if !force && config.is_check_fresh(now) {
            let latest = config.last_check_version.clone();
            let update_available = latest
                .as_deref()
                .is_some_and(|latest| is_update(&self.current_version, latest));
            tracing::debug!(
                "Update check served from cache (channel {}, latest {:?})",
                channel,
                latest
            );
            return UpdateCheckResult {
                update_available,
                current_version: self.current_version.clone(),
                latest_version: latest,
                channel,
                dist_tag: dist_tag.to_string(),
                cached: true,
                error: None,
            };
        }

        let Some(tags) = self.fetch_tags() else {
            return UpdateCheckResult::failed(&self.current_version, channel, NETWORK_ERROR);
        };

        let Some(latest) = tags.get(dist_tag).cloned() else {
            // Not cached: the next check asks the registry again.
            return UpdateCheckResult::failed(
                &self.current_version,
                channel,
                unpublished_channel_error(channel),
            );
        };

        let update_available = is_update(&self.current_version, &latest);

        let updated = UpdateConfig {
            last_check_at: Some(now),
            last_check_version: Some(latest.clone()),
            ..config
        };
        if let Err(e) = self.store.save_update(&updated) {
            tracing::debug!("Could not persist update check metadata: {}", e);
        }

        UpdateCheckResult {
            update_available,
            current_version: self.current_version.clone(),
            latest_version: Some(latest),
            channel,
            dist_tag: dist_tag.to_string(),
            cached: false,
            error: None,
        }
    }

    /// Latest version on every channel from a single registry call.
    pub fn fetch_all_channel_versions(&self) -> ChannelVersions {
        self.fetch_tags()
            .map(|tags| ChannelVersions::from_tags(&tags))
            .unwrap_or_default()
    }
}
