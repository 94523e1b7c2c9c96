//! Update status command implementation.
//!
//! The `milaidy update status` command shows the running version, how it was
//! installed, the effective channel, and what every channel currently offers.

use serde::Serialize;

use crate::cli::args::StatusArgs;
use crate::error::Result;
use crate::ui::UserInterface;
use crate::updates::{
    ChannelVersions, InstallMethod, ReleaseChannel, LOCAL_DEV_MESSAGE, NETWORK_ERROR,
};

use super::dispatcher::{Command, CommandResult};
use super::services::UpdateServices;

/// Machine-readable form of `update status --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport<'a> {
    current_version: &'a str,
    install_method: InstallMethod,
    channel: ReleaseChannel,
    latest: &'a ChannelVersions,
}

/// The update status command implementation.
pub struct UpdateStatusCommand {
    services: UpdateServices,
    args: StatusArgs,
}

impl UpdateStatusCommand {
    /// Create a new status command.
    pub fn new(services: UpdateServices, args: StatusArgs) -> Self {
        Self { services, args }
    }
}

impl Command for UpdateStatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let checker = self.services.checker();
        let method = (self.services.detect)();
        let active = checker.effective_channel();

        if self.args.json {
            let versions = checker.fetch_all_channel_versions();
            let report = StatusReport {
                current_version: checker.current_version(),
                install_method: method,
                channel: active,
                latest: &versions,
            };
            let json = serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        ui.message(&format!("Version:        {}", checker.current_version()));
        ui.message(&format!("Install method: {}", method));
        ui.message(&format!("Channel:        {}", active));

        let mut spinner = ui.start_spinner("Fetching release channels...");
        let versions = checker.fetch_all_channel_versions();
        spinner.finish_clear();

        ui.message("");
        ui.message("Latest releases:");
        for channel in ReleaseChannel::ALL {
            let marker = if channel == active { "*" } else { " " };
            let version = versions.get(channel).unwrap_or("not published");
            ui.message(&format!(
                "  {} {:<8} {:<24} (dist-tag {})",
                marker,
                channel.name(),
                version,
                channel.dist_tag()
            ));
        }

        if ReleaseChannel::ALL
            .iter()
            .all(|channel| versions.get(*channel).is_none())
        {
            ui.warning(NETWORK_ERROR);
        }

        if !method.supports_auto_update() {
            ui.hint(LOCAL_DEV_MESSAGE);
        }

        Ok(CommandResult::success())
    }
}
