//! Persisted configuration repository.
//!
//! The update subsystem never touches the config file directly; it goes
//! through a [`ConfigStore`]. Reads and writes are not locked, so two
//! milaidy processes checking at the same moment can overwrite each
//! other's check metadata. The last writer wins.

use serde_yaml::{Mapping, Value};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

use super::merger::deep_merge;
use super::schema::UpdateConfig;
use crate::error::{MilaidyError, Result};

/// Environment variable that relocates the config file.
pub const CONFIG_ENV_VAR: &str = "MILAIDY_CONFIG";

const UPDATE_KEY: &str = "update";

/// Read/write access to the `update` section of the persisted config.
pub trait ConfigStore {
    /// Load the update section. A missing file or section yields defaults.
    fn load_update(&self) -> Result<UpdateConfig>;

    /// Merge `update` into the stored document, keeping every other key.
    fn save_update(&self, update: &UpdateConfig) -> Result<()>;
}

/// Default config location: `$MILAIDY_CONFIG`, else `~/.milaidy/config.yml`.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    Some(dirs::home_dir()?.join(".milaidy").join("config.yml"))
}

fn update_section(root: &Value, path: &Path) -> Result<UpdateConfig> {
    match root.get(UPDATE_KEY) {
        None | Some(Value::Null) => Ok(UpdateConfig::default()),
        Some(section) => serde_yaml::from_value(section.clone()).map_err(|e| {
            MilaidyError::ConfigParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        }),
    }
}

fn update_overlay(update: &UpdateConfig) -> Result<Value> {
    let section = serde_yaml::to_value(update).map_err(anyhow::Error::from)?;
    let mut overlay = Mapping::new();
    overlay.insert(Value::String(UPDATE_KEY.to_string()), section);
    Ok(Value::Mapping(overlay))
}

/// YAML file backed config store.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    /// Create a store for the given file. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`default_config_path`], or `./.milaidy/config.yml` when no
    /// home directory can be found.
    pub fn at_default_location() -> Self {
        Self::new(
            default_config_path().unwrap_or_else(|| PathBuf::from(".milaidy/config.yml")),
        )
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Value> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Value::Mapping(Mapping::new()));
            }
            Err(e) => return Err(MilaidyError::Io(e)),
        };

        if content.trim().is_empty() {
            return Ok(Value::Mapping(Mapping::new()));
        }

        serde_yaml::from_str(&content).map_err(|e| MilaidyError::ConfigParseError {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}

impl ConfigStore for FileConfigStore {
    fn load_update(&self) -> Result<UpdateConfig> {
        let root = self.read_document()?;
        update_section(&root, &self.path)
    }

    fn save_update(&self, update: &UpdateConfig) -> Result<()> {
        // A document we cannot parse is left alone rather than replaced.
        let root = self.read_document()?;
        let merged = deep_merge(&root, &update_overlay(update)?);

        let write_err = |message: String| MilaidyError::ConfigWriteError {
            path: self.path.clone(),
            message,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }
        let content = serde_yaml::to_string(&merged).map_err(|e| write_err(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| write_err(e.to_string()))?;

        tracing::debug!("Saved update config to {}", self.path.display());
        Ok(())
    }
}

/// In-memory config store for tests and embedding.
#[derive(Debug)]
pub struct MemoryConfigStore {
    document: RefCell<Value>,
    fail_writes: bool,
    writes: Cell<usize>,
}

impl Default for MemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryConfigStore {
    /// Empty store.
    pub fn new() -> Self {
        Self {
            document: RefCell::new(Value::Mapping(Mapping::new())),
            fail_writes: false,
            writes: Cell::new(0),
        }
    }

    /// Store seeded with an update section.
    pub fn with_update(update: &UpdateConfig) -> Self {
        let store = Self::new();
        if let Ok(overlay) = update_overlay(update) {
            store.document.replace(overlay);
        }
        store
    }

    /// Store seeded from a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let document = serde_yaml::from_str(yaml).map_err(anyhow::Error::from)?;
        Ok(Self {
            document: RefCell::new(document),
            ..Self::new()
        })
    }

    /// Make every subsequent save fail.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Snapshot of the whole stored document.
    pub fn document(&self) -> Value {
        self.document.borrow().clone()
    }

    /// Number of successful saves.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load_update(&self) -> Result<UpdateConfig> {
        update_section(&self.document.borrow(), Path::new("<memory>"))
    }

    fn save_update(&self, update: &UpdateConfig) -> Result<()> {
        if self.fail_writes {
            return Err(MilaidyError::ConfigWriteError {
                path: PathBuf::from("<memory>"),
                message: "writes disabled".to_string(),
            });
        }
        let merged = deep_merge(&self.document.borrow(), &update_overlay(update)?);
        self.document.replace(merged);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::updates::ReleaseChannel;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_defaults() {
        let temp = TempDir::new().unwrap();
        let store = FileConfigStore::new(temp.path().join("config.yml"));
        assert_eq!(store.load_update().unwrap(), UpdateConfig::default());
    }

    #[test]
    fn empty_file_loads_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "").unwrap();
        let store = FileConfigStore::new(&path);
        assert_eq!(store.load_update().unwrap(), UpdateConfig::default());
    }

    #[test]
    fn loads_update_section() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(
            &path,
            "agent:\n  name: milady\nupdate:\n  channel: nightly\n  checkIntervalSeconds: 600\n",
        )
        .unwrap();

        let update = FileConfigStore::new(&path).load_update().unwrap();
        assert_eq!(update.channel, Some(ReleaseChannel::Nightly));
        assert_eq!(update.check_interval_seconds, Some(600));
    }

    #[test]
    fn invalid_update_section_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "update:\n  channel: canary\n").unwrap();

        let err = FileConfigStore::new(&path).load_update().unwrap_err();
        assert!(matches!(err, MilaidyError::ConfigParseError { .. }));
    }

    #[test]
    fn save_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".milaidy").join("config.yml");
        let store = FileConfigStore::new(&path);

        store
            .save_update(&UpdateConfig {
                channel: Some(ReleaseChannel::Beta),
                ..Default::default()
            })
            .unwrap();

        assert!(path.exists());
        assert_eq!(
            store.load_update().unwrap().channel,
            Some(ReleaseChannel::Beta)
        );
    }

    #[test]
    fn save_preserves_unrelated_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(
            &path,
            "agent:\n  name: milady\nupdate:\n  channel: beta\n  checkIntervalSeconds: 60\n",
        )
        .unwrap();
        let store = FileConfigStore::new(&path);

        store
            .save_update(&UpdateConfig {
                last_check_version: Some("2.1.0".into()),
                ..Default::default()
            })
            .unwrap();

        let doc: Value = serde_yaml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["agent"]["name"], "milady");
        assert_eq!(doc["update"]["channel"], "beta");
        assert_eq!(doc["update"]["checkIntervalSeconds"], 60);
        assert_eq!(doc["update"]["lastCheckVersion"], "2.1.0");
    }

    #[test]
    fn save_refuses_to_clobber_unparseable_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "agent: [unterminated").unwrap();

        let result = FileConfigStore::new(&path).save_update(&UpdateConfig::default());
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "agent: [unterminated");
    }

    #[test]
    fn memory_store_merges_and_counts_writes() {
        let store = MemoryConfigStore::from_yaml("ui:\n  theme: dark\n").unwrap();
        store
            .save_update(&UpdateConfig {
                channel: Some(ReleaseChannel::Nightly),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(store.write_count(), 1);
        assert_eq!(store.document()["ui"]["theme"], "dark");
        assert_eq!(
            store.load_update().unwrap().channel,
            Some(ReleaseChannel::Nightly)
        );
    }

    #[test]
    fn memory_store_can_fail_writes() {
        let store = MemoryConfigStore::new().failing_writes();
        assert!(store.save_update(&UpdateConfig::default()).is_err());
        assert_eq!(store.write_count(), 0);
    }
}
