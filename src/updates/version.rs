//! Semantic version ordering.
//!
//! Versions follow SemVer 2.0: `major.minor.patch` with an optional
//! `-<prerelease>` suffix. A leading `v` is accepted, and `+build` metadata
//! does not take part in ordering.

use regex::Regex;
use semver::Version;
use std::cmp::Ordering;
use std::sync::LazyLock;

/// Current version of milaidy.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

static EMBEDDED_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+\.\d+\.\d+(?:-[0-9A-Za-z]+(?:\.[0-9A-Za-z]+)*)?")
        .expect("embedded version pattern is valid")
});

fn parse_version(input: &str) -> Option<Version> {
    let input = input.trim();
    Version::parse(input.strip_prefix('v').unwrap_or(input)).ok()
}

/// Compare two version strings by SemVer precedence.
///
/// Returns `None` if either side cannot be parsed.
///
/// # Example
///
/// ```
/// use milaidy::updates::compare_versions;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_versions("2.1.0-beta.1", "2.1.0"), Some(Ordering::Less));
/// assert_eq!(compare_versions("2.0.0", "not-a-version"), None);
/// ```
pub fn compare_versions(a: &str, b: &str) -> Option<Ordering> {
    let a = parse_version(a)?;
    let b = parse_version(b)?;
    Some(a.cmp_precedence(&b))
}

/// Check whether `latest` is strictly newer than `current`.
///
/// Unparseable versions never count as newer.
pub fn is_newer_version(latest: &str, current: &str) -> bool {
    compare_versions(current, latest) == Some(Ordering::Less)
}

/// Find the first version-shaped substring in arbitrary text,
/// e.g. the output of `milaidy --version`.
pub fn extract_version(text: &str) -> Option<String> {
    EMBEDDED_VERSION_RE
        .find(text)
        .map(|m| m.as_str().to_string())
}
