//! Package-manager commands per install method.
//!
//! Pure lookup: no I/O, no PATH checks. Whether the command actually exists
//! on this machine is discovered when the executor spawns it.

use serde::Serialize;
use std::fmt;

use super::channel::ReleaseChannel;
use super::install::{InstallMethod, FLATPAK_APP_ID};
use super::registry::PACKAGE_NAME;

/// An external program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl UpdateCommand {
    /// Build a command from string slices.
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Whether the command escalates through `sudo`.
    pub fn uses_sudo(&self) -> bool {
        self.program == "sudo"
    }

    /// Drop a leading `sudo`, for processes that already run as root.
    pub fn without_sudo(self) -> Self {
        if !self.uses_sudo() {
            return self;
        }
        let mut args = self.args.into_iter();
        match args.next() {
            Some(program) => Self {
                program,
                args: args.collect(),
            },
            None => Self {
                program: self.program,
                args: Vec::new(),
            },
        }
    }
}

impl fmt::Display for UpdateCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Snap store channel. Differs from the npm tag: nightly builds ship on `edge`.
pub fn snap_channel(channel: ReleaseChannel) -> &'static str {
    match channel {
        ReleaseChannel::Stable => "stable",
        ReleaseChannel::Beta => "beta",
        ReleaseChannel::Nightly => "edge",
    }
}

fn package_spec(channel: ReleaseChannel) -> String {
    format!("{}@{}", PACKAGE_NAME, channel.dist_tag())
}

/// Command that upgrades an installation made with `method` to the newest
/// release on `channel`.
///
/// Returns `None` for [`InstallMethod::LocalDev`]: source checkouts are
/// updated with git, never by milaidy itself. [`InstallMethod::Unknown`]
/// falls back to npm.
pub fn build_update_command(method: InstallMethod, channel: ReleaseChannel) -> Option<UpdateCommand> {
    let spec = package_spec(channel);

    let command = match method {
        InstallMethod::NpmGlobal | InstallMethod::Unknown => {
            UpdateCommand::new("npm", &["install", "-g", &spec])
        }
        InstallMethod::BunGlobal => UpdateCommand::new("bun", &["add", "-g", &spec]),
        InstallMethod::PnpmGlobal => UpdateCommand::new("pnpm", &["add", "-g", &spec]),
        InstallMethod::Homebrew => UpdateCommand::new("brew", &["upgrade", PACKAGE_NAME]),
        InstallMethod::Snap => {
            let channel_flag = format!("--channel={}", snap_channel(channel));
            UpdateCommand::new("sudo", &["snap", "refresh", PACKAGE_NAME, &channel_flag])
        }
        InstallMethod::Apt => {
            let script = format!(
                "apt-get update && apt-get install --only-upgrade -y {}",
                PACKAGE_NAME
            );
            UpdateCommand::new("sudo", &["sh", "-c", &script])
        }
        InstallMethod::Flatpak => UpdateCommand::new("flatpak", &["update", "-y", FLATPAK_APP_ID]),
        InstallMethod::LocalDev => return None,
    };

    Some(command)
}
