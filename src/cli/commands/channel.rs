//! Channel command implementation.
//!
//! `milaidy update channel` shows the effective channel;
//! `milaidy update channel <name>` persists a new one.

use crate::cli::args::ChannelArgs;
use crate::error::Result;
use crate::ui::UserInterface;
use crate::updates::{ReleaseChannel, CHANNEL_ENV_VAR};

use super::dispatcher::{Command, CommandResult};
use super::services::UpdateServices;

/// The channel command implementation.
pub struct ChannelCommand {
    services: UpdateServices,
    args: ChannelArgs,
}

impl ChannelCommand {
    /// Create a new channel command.
    pub fn new(services: UpdateServices, args: ChannelArgs) -> Self {
        Self { services, args }
    }

    fn show(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.services.store.load_update()?;
        let effective = (self.services.channel_resolver)(Some(&config));
        let saved = config.channel.unwrap_or_default();

        ui.message(&format!("Release channel: {}", effective));
        if effective != saved {
            ui.hint(&format!(
                "Overridden by {}; the saved channel is {}.",
                CHANNEL_ENV_VAR, saved
            ));
        }
        Ok(CommandResult::success())
    }

    fn switch(&self, name: &str, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let channel = match name.parse::<ReleaseChannel>() {
            Ok(channel) => channel,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
        };

        let previous = self.services.store.load_update()?.channel.unwrap_or_default();
        self.services.save_channel(channel)?;
        ui.success(&format!("Release channel set to {}", channel));

        if previous != channel {
            ui.hint("Run `milaidy update` to install the latest release on this channel.");
        }

        let config = self.services.store.load_update()?;
        let effective = (self.services.channel_resolver)(Some(&config));
        if effective != channel {
            ui.warning(&format!(
                "{} is set, so updates keep using the {} channel.",
                CHANNEL_ENV_VAR, effective
            ));
        }

        Ok(CommandResult::success())
    }
}

impl Command for ChannelCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match self.args.name.as_deref() {
            Some(name) => self.switch(name, ui),
            None => self.show(ui),
        }
    }
}
