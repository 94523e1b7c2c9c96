//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, UpdateAction};
use crate::error::Result;
use crate::ui::UserInterface;
use crate::updates::is_notification_suppressed;

use super::channel::ChannelCommand;
use super::completions::CompletionsCommand;
use super::home::HomeCommand;
use super::services::UpdateServices;
use super::status::UpdateStatusCommand;
use super::update::UpdateNowCommand;
use super::version::VersionCommand;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    config_path: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a dispatcher. `config_path` overrides the default config file.
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }

    /// Get the config file override, if any.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn services(&self) -> UpdateServices {
        UpdateServices::system(self.config_path())
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Update(args)) => match &args.action {
                Some(UpdateAction::Status(status_args)) => {
                    UpdateStatusCommand::new(self.services(), status_args.clone()).execute(ui)
                }
                Some(UpdateAction::Channel(channel_args)) => {
                    ChannelCommand::new(self.services(), channel_args.clone()).execute(ui)
                }
                None => UpdateNowCommand::new(self.services(), args.clone()).execute(ui),
            },
            Some(Commands::Version) => VersionCommand.execute(ui),
            Some(Commands::Completions(args)) => {
                CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => {
                let notify = !is_notification_suppressed();
                HomeCommand::new(self.services(), notify).execute(ui)
            }
        }
    }
}
