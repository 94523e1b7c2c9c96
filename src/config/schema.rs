//! Typed view of the persisted `update` section.
//!
//! ```yaml
//! update:
//!   channel: beta
//!   lastCheckAt: 2026-10-19T08:30:00Z
//!   lastCheckVersion: 2.1.0-beta.2
//!   checkIntervalSeconds: 3600
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::updates::ReleaseChannel;

/// Default interval between registry checks (4 hours).
pub const DEFAULT_CHECK_INTERVAL_SECS: i64 = 14_400;

/// How far in the future `lastCheckAt` may be before it is distrusted.
pub const CLOCK_SKEW_TOLERANCE_SECS: i64 = 300;

/// Update settings and check metadata stored under the `update` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfig {
    /// Channel the user opted into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<ReleaseChannel>,

    /// When the registry was last queried successfully.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_check_at: Option<DateTime<Utc>>,

    /// Version found on the channel at the last check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_check_version: Option<String>,

    /// Minimum seconds between registry checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_interval_seconds: Option<i64>,
}

impl UpdateConfig {
    /// Effective check interval. Non-positive values fall back to the default.
    pub fn check_interval(&self) -> i64 {
        self.check_interval_seconds
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_CHECK_INTERVAL_SECS)
    }

    /// `lastCheckAt`, unless it lies further in the future than the skew
    /// tolerance allows.
    pub fn trusted_last_check(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.last_check_at
            .filter(|at| *at <= now + Duration::seconds(CLOCK_SKEW_TOLERANCE_SECS))
    }

    /// Whether a check performed at `lastCheckAt` is still within the interval.
    pub fn is_check_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.trusted_last_check(now) {
            Some(at) => now.signed_duration_since(at).num_seconds() < self.check_interval(),
            None => false,
        }
    }
}
