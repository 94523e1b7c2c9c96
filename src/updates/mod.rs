//! Update checking and self-updating functionality.
//!
//! This module provides:
//! - Version ordering in [`version`]
//! - Release channels and channel resolution in [`channel`]
//! - npm registry lookups in [`registry`]
//! - Cached update checks in [`checker`]
//! - Install method detection in [`install`]
//! - Per-method upgrade commands in [`command`]
//! - Command execution and verification in [`executor`]
//! - Startup notifications in [`notify`]

pub mod channel;
pub mod checker;
pub mod command;
pub mod executor;
pub mod install;
pub mod notify;
pub mod registry;
pub mod version;

pub use channel::{resolve_channel, resolve_channel_with_env, ReleaseChannel, CHANNEL_ENV_VAR};
pub use checker::{ChannelVersions, UpdateCheckResult, UpdateChecker, NETWORK_ERROR};
pub use command::{build_update_command, snap_channel, UpdateCommand};
pub use executor::{perform_update, UpdateExecutor, UpdateResult, LOCAL_DEV_MESSAGE};
pub use install::{
    classify_install_path, detect_from, detect_install_method, InstallMethod, BINARY_NAME,
};
pub use notify::{
    format_notification, is_notification_suppressed, show_update_notification, SUPPRESS_ENV_VAR,
};
pub use registry::{
    Deadline, DistTagSource, DistTags, RegistryClient, DEFAULT_REGISTRY_URL, PACKAGE_NAME,
    REGISTRY_ENV_VAR,
};
pub use version::{compare_versions, extract_version, is_newer_version, VERSION};
