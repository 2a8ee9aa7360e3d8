use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::{app_config_path, config_env_dirs, ConfigPathError, APP_DIR, STORAGE_FILE};

mod records;

pub use records::{AppStateRecord, PanelPosition, SettingsStore, StoredState};

pub const SETTINGS_KEY: &str = "vivideoSettings";
pub const PROFILES_KEY: &str = "vivideoProfiles";
pub const THEME_KEY: &str = "vivideoTheme";
pub const THEME_COLORS_KEY: &str = "vivideoThemeColors";
pub const APP_STATE_KEY: &str = "vivideoAppState";
pub const SHORTCUTS_KEY: &str = "vivideoShortcuts";

pub const ALL_KEYS: [&str; 6] = [
    SETTINGS_KEY,
    PROFILES_KEY,
    THEME_KEY,
    THEME_COLORS_KEY,
    APP_STATE_KEY,
    SHORTCUTS_KEY,
];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("failed to read storage file: {path}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write storage file: {path}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to encode or decode stored value")]
    Serde(#[from] serde_json::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

pub type Record = Map<String, Value>;

/// Key/value persistence boundary. Every `set` fully replaces the values of
/// the keys it carries.
pub trait KeyValueStore {
    fn get(&self, keys: &[&str]) -> StorageResult<Record>;
    fn set(&mut self, record: Record) -> StorageResult<()>;
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Record,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates an unreachable backend: every call fails.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    fn check(&self) -> StorageResult<()> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, keys: &[&str]) -> StorageResult<Record> {
        self.check()?;
        Ok(select_keys(&self.entries, keys))
    }

    fn set(&mut self, record: Record) -> StorageResult<()> {
        self.check()?;
        self.entries.extend(record);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.check()?;
        self.entries.remove(key);
        Ok(())
    }
}

/// Single JSON object file holding every key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn with_default_path() -> StorageResult<Self> {
        let (xdg_config_home, home) = config_env_dirs();
        Self::with_default_path_in(xdg_config_home.as_deref(), home.as_deref())
    }

    fn with_default_path_in(
        xdg_config_home: Option<&Path>,
        home: Option<&Path>,
    ) -> StorageResult<Self> {
        let path = app_config_path(APP_DIR, STORAGE_FILE, xdg_config_home, home).map_err(
            |error| match error {
                ConfigPathError::MissingHomeDirectory => StorageError::MissingHomeDirectory,
            },
        )?;
        Ok(Self::with_path(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> StorageResult<Record> {
        if !self.path.exists() {
            return Ok(Record::new());
        }
        let serialized = fs::read_to_string(&self.path).map_err(|source| StorageError::Read {
            path: self.path.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&serialized)?;
        match value {
            Value::Object(entries) => Ok(entries),
            _ => {
                tracing::warn!(
                    path = %self.path.display(),
                    "storage file is not an object; ignoring"
                );
                Ok(Record::new())
            }
        }
    }

    fn write_all(&self, entries: &Record) -> StorageResult<()> {
        let write_error = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        let serialized = serde_json::to_string_pretty(entries)?;
        // Write beside the target and rename so a crash never leaves half a file.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, serialized).map_err(write_error)?;
        fs::rename(&staging, &self.path).map_err(write_error)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, keys: &[&str]) -> StorageResult<Record> {
        Ok(select_keys(&self.read_all()?, keys))
    }

    fn set(&mut self, record: Record) -> StorageResult<()> {
        let mut entries = match self.read_all() {
            Err(StorageError::Serde(err)) => {
                tracing::warn!(
                    ?err,
                    path = %self.path.display(),
                    "storage file is corrupt; rewriting"
                );
                Record::new()
            }
            other => other?,
        };
        entries.extend(record);
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

fn select_keys(entries: &Record, keys: &[&str]) -> Record {
    keys.iter()
        .filter_map(|key| {
            entries
                .get(*key)
                .map(|value| ((*key).to_string(), value.clone()))
        })
        .collect()
}

pub(crate) fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> StorageResult<Record> {
    let mut record = Record::new();
    record.insert(key.to_string(), serde_json::to_value(value)?);
    Ok(record)
}

pub(crate) fn decode<T: DeserializeOwned>(record: &Record, key: &str) -> Option<T> {
    let value = record.get(key)?;
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            tracing::warn!(?err, key, "ignoring undecodable stored value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture_root() -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let pid = std::process::id();
        path.push(format!("vivideo-storage-{pid}-{nanos}"));
        path
    }

    fn with_temp_root<F: FnOnce(&Path)>(f: F) {
        let root = fixture_root();
        fs::create_dir_all(&root).unwrap();
        f(&root);
        let _ = fs::remove_dir_all(&root);
    }

    fn record(key: &str, value: Value) -> Record {
        let mut record = Record::new();
        record.insert(key.to_string(), value);
        record
    }

    #[test]
    fn memory_store_returns_only_requested_keys() {
        let mut store = MemoryStore::new();
        store.set(record(SETTINGS_KEY, json!({"brightness": 5}))).unwrap();
        store.set(record(THEME_KEY, json!("light"))).unwrap();

        let fetched = store.get(&[THEME_KEY, PROFILES_KEY]).unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[THEME_KEY], json!("light"));

        store.remove(THEME_KEY).unwrap();
        assert!(store.get(&[THEME_KEY]).unwrap().is_empty());
    }

    #[test]
    fn unavailable_memory_store_fails_every_call() {
        let mut store = MemoryStore::new();
        store.set_unavailable(true);
        assert!(matches!(store.get(&ALL_KEYS), Err(StorageError::Unavailable)));
        assert!(matches!(
            store.set(Record::new()),
            Err(StorageError::Unavailable)
        ));
    }

    #[test]
    fn json_file_store_merges_writes() {
        with_temp_root(|root| {
            let mut store = JsonFileStore::with_default_path_in(Some(root), None).unwrap();
            assert!(store.path().ends_with("vivideo/storage.json"));
            assert!(store.get(&ALL_KEYS).unwrap().is_empty());

            store.set(record(THEME_KEY, json!("sunset"))).unwrap();
            store.set(record(SETTINGS_KEY, json!({"gamma": 1.5}))).unwrap();
            store.set(record(THEME_KEY, json!("light"))).unwrap();

            let reopened = JsonFileStore::with_path(store.path().to_path_buf());
            let fetched = reopened.get(&ALL_KEYS).unwrap();
            assert_eq!(fetched[THEME_KEY], json!("light"));
            assert_eq!(fetched[SETTINGS_KEY]["gamma"], json!(1.5));

            store.remove(SETTINGS_KEY).unwrap();
            assert!(reopened.get(&[SETTINGS_KEY]).unwrap().is_empty());
        });
    }

    #[test]
    fn json_file_store_default_path_needs_a_home() {
        assert!(matches!(
            JsonFileStore::with_default_path_in(None, None),
            Err(StorageError::MissingHomeDirectory)
        ));
        let store =
            JsonFileStore::with_default_path_in(None, Some(Path::new("/tmp/home"))).unwrap();
        assert_eq!(
            store.path(),
            Path::new("/tmp/home/.config/vivideo/storage.json")
        );
    }

    #[test]
    fn json_file_store_rejects_invalid_payload() {
        with_temp_root(|root| {
            let path = root.join("storage.json");
            fs::write(&path, "{ invalid ").unwrap();
            let store = JsonFileStore::with_path(path);
            assert!(matches!(store.get(&ALL_KEYS), Err(StorageError::Serde(_))));
        });
    }

    #[test]
    fn json_file_store_set_recovers_from_corrupt_file() {
        with_temp_root(|root| {
            let path = root.join("storage.json");
            fs::write(&path, "{ truncated").unwrap();
            let mut store = JsonFileStore::with_path(path.clone());

            store
                .set(record(THEME_KEY, json!("sunset")))
                .expect("set should overwrite a corrupt file");

            let fetched = store.get(&ALL_KEYS).unwrap();
            assert_eq!(fetched.len(), 1);
            assert_eq!(fetched[THEME_KEY], json!("sunset"));
            assert!(!path.with_extension("json.tmp").exists());
        });
    }

    #[test]
    fn decode_skips_values_of_the_wrong_shape() {
        let stored = record(THEME_KEY, json!(42));
        assert_eq!(decode::<String>(&stored, THEME_KEY), None);
        assert_eq!(decode::<String>(&stored, SETTINGS_KEY), None);
    }
}
