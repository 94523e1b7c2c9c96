//! Facts about the process environment the updater runs in.

pub mod platform;

pub use platform::{is_ci, is_ci_with_env, is_elevated};
