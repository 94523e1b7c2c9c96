//! Version command implementation.
//!
//! `milaidy version` prints the same line as `milaidy --version`; the
//! updater re-invokes it to confirm what got installed.

use crate::error::Result;
use crate::ui::UserInterface;
use crate::updates::{BINARY_NAME, VERSION};

use super::dispatcher::{Command, CommandResult};

/// The version command implementation.
pub struct VersionCommand;

impl Command for VersionCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.message(&format!("{} {}", BINARY_NAME, VERSION));
        Ok(CommandResult::success())
    }
}
