//! Release channels and channel resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::UpdateConfig;
use crate::error::MilaidyError;

/// Environment variable that overrides the persisted channel.
pub const CHANNEL_ENV_VAR: &str = "MILAIDY_UPDATE_CHANNEL";

/// A named update track a user opts into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseChannel {
    #[default]
    Stable,
    Beta,
    Nightly,
}

impl ReleaseChannel {
    /// All channels, in display order.
    pub const ALL: [ReleaseChannel; 3] = [Self::Stable, Self::Beta, Self::Nightly];

    /// The channel's name as users type it.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Beta => "beta",
            Self::Nightly => "nightly",
        }
    }

    /// The npm dist-tag this channel is published under.
    pub fn dist_tag(&self) -> &'static str {
        match self {
            Self::Stable => "latest",
            Self::Beta => "beta",
            Self::Nightly => "nightly",
        }
    }

    /// Parse a channel name exactly as the environment override does:
    /// trimmed, case-insensitive, no aliases.
    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "stable" => Some(Self::Stable),
            "beta" => Some(Self::Beta),
            "nightly" => Some(Self::Nightly),
            _ => None,
        }
    }
}

impl fmt::Display for ReleaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReleaseChannel {
    type Err = MilaidyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_lenient(s).ok_or_else(|| MilaidyError::InvalidChannel {
            name: s.to_string(),
        })
    }
}

/// Resolve the effective release channel.
///
/// Precedence: `MILAIDY_UPDATE_CHANNEL`, then the persisted channel, then
/// [`ReleaseChannel::Stable`]. Unrecognized environment values are ignored.
pub fn resolve_channel(config: Option<&UpdateConfig>) -> ReleaseChannel {
    resolve_channel_with_env(config, |key: &str| std::env::var(key))
}

/// Resolve the effective release channel with a custom env var lookup.
///
/// This allows testing without modifying actual environment variables.
pub fn resolve_channel_with_env<F>(config: Option<&UpdateConfig>, env_fn: F) -> ReleaseChannel
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    if let Some(channel) = env_fn(CHANNEL_ENV_VAR)
        .ok()
        .and_then(|value| ReleaseChannel::parse_lenient(&value))
    {
        return channel;
    }

    config
        .and_then(|c| c.channel)
        .unwrap_or(ReleaseChannel::Stable)
}
