//! Update command implementation.
//!
//! `milaidy update` always checks the registry (the interval cache is for
//! the startup notice only), then detects how milaidy was installed and runs
//! the matching package-manager command.

use crate::cli::args::UpdateArgs;
use crate::error::Result;
use crate::ui::{Prompt, UserInterface};
use crate::updates::{build_update_command, LOCAL_DEV_MESSAGE};

use super::dispatcher::{Command, CommandResult};
use super::services::UpdateServices;

/// The update command implementation.
pub struct UpdateNowCommand {
    services: UpdateServices,
    args: UpdateArgs,
}

impl UpdateNowCommand {
    /// Create a new update command.
    pub fn new(services: UpdateServices, args: UpdateArgs) -> Self {
        Self { services, args }
    }
}

impl Command for UpdateNowCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if let Some(channel) = self.args.channel {
            self.services.save_channel(channel)?;
            if !self.args.json {
                ui.success(&format!("Release channel set to {}", channel));
            }
        }

        let checker = self.services.checker();
        let mut spinner = ui.start_spinner("Checking for updates...");
        let check = checker.check(true);
        spinner.finish_clear();

        if self.args.json {
            let json = serde_json::to_string_pretty(&check).map_err(anyhow::Error::from)?;
            ui.message(&json);
            return Ok(match check.error {
                Some(_) => CommandResult::failure(1),
                None => CommandResult::success(),
            });
        }

        if let Some(error) = &check.error {
            ui.error(error);
            return Ok(CommandResult::failure(1));
        }

        let latest = match (&check.latest_version, check.update_available) {
            (Some(latest), true) => latest.clone(),
            _ => {
                ui.success(&format!(
                    "milaidy {} is up to date ({} channel)",
                    check.current_version, check.channel
                ));
                return Ok(CommandResult::success());
            }
        };

        ui.message(&format!(
            "Update available: {} -> {} ({} channel)",
            check.current_version, latest, check.channel
        ));

        if self.args.check {
            ui.hint("Run `milaidy update` to install it.");
            return Ok(CommandResult::success());
        }

        let method = (self.services.detect)();
        tracing::debug!("Detected install method: {}", method);
        let command = match build_update_command(method, check.channel) {
            Some(command) => command,
            None => {
                ui.error(LOCAL_DEV_MESSAGE);
                return Ok(CommandResult::failure(1));
            }
        };

        ui.message(&format!("Installed via {}; will run:", method));
        ui.hint(&command.to_string());

        if !self.args.yes {
            let prompt = Prompt::new("apply_update", format!("Install milaidy {}?", latest), true);
            if !ui.confirm(&prompt)? {
                ui.message("Update cancelled.");
                return Ok(CommandResult::success());
            }
        }

        let result = self
            .services
            .executor
            .run(method, command, &check.current_version);

        if !result.success {
            let error = result.error.as_deref().unwrap_or("unknown error");
            ui.error(&format!("Update failed: {}", error));
            if result.command.starts_with("sudo ") {
                ui.hint("The command needs administrator rights; re-run it manually if sudo was refused.");
            }
            return Ok(CommandResult::failure(1));
        }

        match &result.new_version {
            Some(new_version) => ui.success(&format!(
                "Updated milaidy {} -> {}",
                result.previous_version, new_version
            )),
            None => {
                ui.success(&format!("Updated milaidy to {}", latest));
                ui.warning("Could not confirm the installed version; run `milaidy --version` to check.");
            }
        }

        Ok(CommandResult::success())
    }
}
