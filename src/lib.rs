//! milaidy - self-update support for the milaidy assistant CLI.
//!
//! milaidy ships through many channels (npm, bun, pnpm, Homebrew, snap, apt,
//! Flatpak, or a source checkout). This crate figures out which one produced
//! the running binary, asks the npm registry what the user's release channel
//! offers, and hands the upgrade to the right package manager.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Persisted `update` settings and check metadata
//! - [`error`] - Error types and result aliases
//! - [`shell`] - CI and privilege detection
//! - [`ui`] - Prompts, spinners, and terminal output
//! - [`updates`] - Version checks, install detection, and upgrades
//!
//! # Example
//!
//! ```
//! use milaidy::updates::{build_update_command, is_newer_version, InstallMethod, ReleaseChannel};
//!
//! assert!(is_newer_version("2.1.0", "2.0.0-alpha.7"));
//!
//! let cmd = build_update_command(InstallMethod::Snap, ReleaseChannel::Nightly).unwrap();
//! assert_eq!(cmd.to_string(), "sudo snap refresh milaidy --channel=edge");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod shell;
pub mod ui;
pub mod updates;

pub use error::{MilaidyError, Result};
