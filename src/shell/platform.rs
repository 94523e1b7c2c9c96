//! Platform detection.

use std::env::VarError;

/// Environment variables whose presence marks a CI run.
const CI_ENV_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
];

/// Check if running in a CI environment.
///
/// Used to keep startup notifications out of build logs.
pub fn is_ci() -> bool {
    is_ci_with_env(|name| std::env::var(name))
}

/// [`is_ci`] with an injectable environment lookup.
pub fn is_ci_with_env<F>(env_fn: F) -> bool
where
    F: Fn(&str) -> Result<String, VarError>,
{
    CI_ENV_VARS.iter().any(|name| env_fn(name).is_ok())
}

/// Check if running as root/admin.
///
/// When true, `sudo` is dropped from update commands.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(windows)]
    {
        std::env::var("ADMIN").is_ok()
    }

    #[cfg(not(any(unix, windows)))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ci_detected_from_any_marker() {
        let env = |name: &str| {
            if name == "GITHUB_ACTIONS" {
                Ok("true".to_string())
            } else {
                Err(VarError::NotPresent)
            }
        };
        assert!(is_ci_with_env(env));
    }

    #[test]
    fn no_markers_means_not_ci() {
        assert!(!is_ci_with_env(|_| Err(VarError::NotPresent)));
    }

    #[cfg(unix)]
    #[test]
    fn is_elevated_matches_effective_uid() {
        let output = std::process::Command::new("id").arg("-u").output().unwrap();
        let uid = String::from_utf8_lossy(&output.stdout).trim().to_string();
        assert_eq!(is_elevated(), uid == "0");
    }
}
