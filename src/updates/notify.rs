//! One-line "update available" notice printed on plain startup.

use std::env::VarError;

use crate::shell::is_ci_with_env;
use crate::ui::UserInterface;

use super::checker::{UpdateCheckResult, UpdateChecker};
use super::install::BINARY_NAME;

/// Set to anything but `0` to turn the startup notice off.
pub const SUPPRESS_ENV_VAR: &str = "MILAIDY_NO_UPDATE_CHECK";

/// Whether the startup notice should be skipped.
pub fn is_notification_suppressed() -> bool {
    is_notification_suppressed_with_env(|name| std::env::var(name))
}

/// [`is_notification_suppressed`] with an injectable environment lookup.
pub fn is_notification_suppressed_with_env<F>(env_fn: F) -> bool
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let opted_out = env_fn(SUPPRESS_ENV_VAR)
        .map(|value| {
            let value = value.trim();
            !value.is_empty() && value != "0"
        })
        .unwrap_or(false);

    opted_out || is_ci_with_env(env_fn)
}

/// Text of the notice for an available update.
pub fn format_notification(result: &UpdateCheckResult) -> Option<String> {
    if !result.update_available {
        return None;
    }
    let latest = result.latest_version.as_deref()?;
    Some(format!(
        "Update available: {} -> {} ({} channel). Run `{} update` to upgrade.",
        result.current_version, latest, result.channel, BINARY_NAME
    ))
}

/// Run a cached check and print the notice when an update exists.
///
/// Check errors are never shown here; they only reach the debug log.
pub fn show_update_notification(
    checker: &UpdateChecker<'_>,
    ui: &mut dyn UserInterface,
) -> Option<UpdateCheckResult> {
    let result = checker.check(false);

    if let Some(error) = &result.error {
        tracing::debug!("Skipping update notice: {}", error);
        return Some(result);
    }

    if let Some(line) = format_notification(&result) {
        ui.warning(&line);
    }
    Some(result)
}
