//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::updates::ReleaseChannel;

/// milaidy - a personal AI assistant.
#[derive(Debug, Parser)]
#[command(name = "milaidy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default ~/.milaidy/config.yml)
    #[arg(short, long, global = true, env = "MILAIDY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check for and install milaidy updates
    Update(UpdateArgs),

    /// Print the milaidy version
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `update` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct UpdateArgs {
    #[command(subcommand)]
    pub action: Option<UpdateAction>,

    /// Only check for an update, do not install it
    #[arg(long)]
    pub check: bool,

    /// Switch to this release channel before checking
    #[arg(long, value_parser = parse_channel)]
    pub channel: Option<ReleaseChannel>,

    /// Install without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Print the check result as JSON and stop (implies --check)
    #[arg(long)]
    pub json: bool,
}

/// Subcommands of `update`.
#[derive(Debug, Clone, Subcommand)]
pub enum UpdateAction {
    /// Show version, install method, and the latest release on every channel
    Status(StatusArgs),

    /// Show or change the release channel
    Channel(ChannelArgs),
}

/// Arguments for `update status`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `update channel`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ChannelArgs {
    /// Channel to switch to (stable, beta, nightly); omit to show the current one
    pub name: Option<String>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

fn parse_channel(value: &str) -> Result<ReleaseChannel, String> {
    value.parse::<ReleaseChannel>().map_err(|e| e.to_string())
}
