//! Persisted configuration for milaidy.
//!
//! milaidy keeps one YAML document at `~/.milaidy/config.yml` (or
//! `$MILAIDY_CONFIG`). The update subsystem owns only the `update` section:
//! - Schema and interval rules in [`schema`]
//! - Repository abstraction and file/memory stores in [`store`]
//! - Deep merging for partial writes in [`merger`]
//!
//! # Example
//!
//! ```
//! use milaidy::config::{ConfigStore, FileConfigStore, UpdateConfig};
//! use milaidy::updates::ReleaseChannel;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let store = FileConfigStore::new(temp.path().join("config.yml"));
//! store
//!     .save_update(&UpdateConfig {
//!         channel: Some(ReleaseChannel::Beta),
//!         ..Default::default()
//!     })
//!     .unwrap();
//! assert_eq!(store.load_update().unwrap().channel, Some(ReleaseChannel::Beta));
//! ```

pub mod merger;
pub mod schema;
pub mod store;

pub use merger::deep_merge;
pub use schema::{UpdateConfig, CLOCK_SKEW_TOLERANCE_SECS, DEFAULT_CHECK_INTERVAL_SECS};
pub use store::{default_config_path, ConfigStore, FileConfigStore, MemoryConfigStore};
