//! npm registry dist-tag lookup.
//!
//! A single GET for the package's abbreviated metadata. Every failure mode
//! (timeout, HTTP error, bad body) collapses to `None`: the caller reports
//! "registry unreachable" and carries on.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Public npm registry.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Environment variable that points the client at another registry.
pub const REGISTRY_ENV_VAR: &str = "MILAIDY_REGISTRY_URL";

/// Package name on the registry.
pub const PACKAGE_NAME: &str = "milaidy";

/// Hard limit on a registry lookup.
pub const REGISTRY_TIMEOUT: Duration = Duration::from_secs(8);

/// Ask for the abbreviated ("corgi") document; it still carries dist-tags.
const ABBREVIATED_METADATA: &str =
    "application/vnd.npm.install-v1+json; q=1.0, application/json; q=0.8, */*";

/// Dist-tag name to version, e.g. `latest -> 2.1.0`.
pub type DistTags = HashMap<String, String>;

/// Point in time after which a pending operation is abandoned.
///
/// Passed explicitly into network calls so an outer caller can impose a
/// tighter limit with [`Deadline::earliest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    expires_at: Instant,
}

impl Deadline {
    /// Deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            expires_at: Instant::now() + timeout,
        }
    }

    /// The registry default of 8 seconds from now.
    pub fn registry_default() -> Self {
        Self::after(REGISTRY_TIMEOUT)
    }

    /// Time left, or `None` once expired.
    pub fn remaining(&self) -> Option<Duration> {
        self.expires_at
            .checked_duration_since(Instant::now())
            .filter(|left| !left.is_zero())
    }

    /// The sooner of two deadlines.
    pub fn earliest(self, other: Deadline) -> Deadline {
        if other.expires_at < self.expires_at {
            other
        } else {
            self
        }
    }
}

/// Source of dist-tags. Implemented by [`RegistryClient`]; tests substitute
/// their own.
pub trait DistTagSource {
    /// Fetch the dist-tags map, or `None` on any failure.
    fn fetch_dist_tags(&self, deadline: &Deadline) -> Option<DistTags>;
}

#[derive(Debug, Deserialize)]
struct PackageMetadata {
    #[serde(rename = "dist-tags")]
    dist_tags: Option<DistTags>,
}

/// HTTP client for the npm registry.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    base_url: String,
    package: String,
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::from_env()
    }
}

impl RegistryClient {
    /// Client for `package` on the registry at `base_url`.
    pub fn new(base_url: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            package: package.into(),
        }
    }

    /// Client for milaidy on `$MILAIDY_REGISTRY_URL` or the public registry.
    pub fn from_env() -> Self {
        let base_url = std::env::var(REGISTRY_ENV_VAR)
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string());
        Self::new(base_url, PACKAGE_NAME)
    }

    /// Full metadata URL.
    pub fn package_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.package)
    }

    fn fetch(&self, deadline: &Deadline) -> Result<DistTags, String> {
        let timeout = deadline
            .remaining()
            .ok_or_else(|| "deadline expired before request".to_string())?;

        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("milaidy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| e.to_string())?;

        let url = self.package_url();
        let response = client
            .get(&url)
            .header(reqwest::header::ACCEPT, ABBREVIATED_METADATA)
            .timeout(timeout)
            .send()
            .map_err(|e| format!("request to {} failed: {}", url, e))?;

        if !response.status().is_success() {
            return Err(format!("HTTP {} fetching {}", response.status(), url));
        }

        let metadata: PackageMetadata = response
            .json()
            .map_err(|e| format!("malformed registry response: {}", e))?;

        metadata
            .dist_tags
            .ok_or_else(|| "registry response has no dist-tags".to_string())
    }
}

impl DistTagSource for RegistryClient {
    fn fetch_dist_tags(&self, deadline: &Deadline) -> Option<DistTags> {
        match self.fetch(deadline) {
            Ok(tags) => {
                tracing::debug!("Fetched {} dist-tags for {}", tags.len(), self.package);
                Some(tags)
            }
            Err(reason) => {
                tracing::debug!("Registry lookup failed: {}", reason);
                None
            }
        }
    }
}
