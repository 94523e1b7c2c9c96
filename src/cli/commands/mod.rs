//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`]. The update commands
//! share an [`UpdateServices`] bundle so tests can swap the config store,
//! registry, and install detection.

pub mod channel;
pub mod completions;
pub mod dispatcher;
pub mod home;
pub mod services;
pub mod status;
pub mod update;
pub mod version;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use services::UpdateServices;
