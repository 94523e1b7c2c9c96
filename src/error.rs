//! Error types for milaidy operations.
//!
//! This module defines [`MilaidyError`], the error type used by the
//! configuration layer and CLI commands, and a [`Result`] type alias.
//!
//! # Error Handling Strategy
//!
//! - Network and package-manager failures inside the update subsystem are
//!   reported as values (`UpdateCheckResult::error`, `UpdateResult::error`),
//!   never as `Err`
//! - Use `MilaidyError` for infrastructure failures that need distinct handling
//! - Use `anyhow::Error` (via `MilaidyError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for milaidy operations.
#[derive(Debug, Error)]
pub enum MilaidyError {
    /// Failed to parse the persisted configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Failed to write the persisted configuration file.
    #[error("Failed to write config at {path}: {message}")]
    ConfigWriteError { path: PathBuf, message: String },

    /// A release channel name that is not stable, beta, or nightly.
    #[error("Invalid release channel '{name}' (expected stable, beta, or nightly)")]
    InvalidChannel { name: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for milaidy operations.
pub type Result<T> = std::result::Result<T, MilaidyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = MilaidyError::ConfigParseError {
            path: PathBuf::from("/home/u/.milaidy/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/home/u/.milaidy/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn invalid_channel_lists_valid_names() {
        let err = MilaidyError::InvalidChannel {
            name: "canary".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("canary"));
        assert!(msg.contains("stable, beta, or nightly"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: MilaidyError = io_err.into();
        assert!(matches!(err, MilaidyError::Io(_)));
    }

    #[test]
    fn anyhow_error_is_transparent() {
        let err: MilaidyError = anyhow::anyhow!("boom").into();
        assert_eq!(err.to_string(), "boom");
    }
}
