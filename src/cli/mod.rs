//! Command-line interface for milaidy.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    ChannelArgs, Cli, Commands, CompletionsArgs, StatusArgs, UpdateAction, UpdateArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult, UpdateServices};
