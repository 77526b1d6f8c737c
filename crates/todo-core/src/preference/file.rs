//! File-backed preference store
//!
//! All preferences share one JSON object file mapping keys to stored
//! strings. Writes go to a temporary file which is then renamed over the
//! target, so the file is never left half-written.
//!
//! Storage location: `~/.local/share/todo/preferences.json` (configurable
//! via `Config`)

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::warn;

use super::PreferenceStore;
use crate::error::PreferenceError;

type Values = BTreeMap<String, String>;

/// Preferences persisted to a JSON file
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored value
    ///
    /// A missing file is empty. A file that is not a JSON object of strings
    /// is also treated as empty and will be replaced on the next write.
    fn read_all(&self) -> Result<Values, PreferenceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Values::new()),
            Err(source) => {
                return Err(PreferenceError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_str(&content) {
            Ok(values) => Ok(values),
            Err(e) => {
                warn!("Ignoring unreadable preferences file {:?}: {}", self.path, e);
                Ok(Values::new())
            }
        }
    }

    fn write_all(&self, values: &Values) -> Result<(), PreferenceError> {
        let json = serde_json::to_string_pretty(values)?;
        atomic_write(&self.path, json.as_bytes()).map_err(|source| PreferenceError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }
}

/// Write data to a file atomically
fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Same directory so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    fs::rename(&temp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference::DarkMode;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(temp_dir.path().join("preferences.json"));
        assert_eq!(store.get_item("darkMode").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");

        FilePreferenceStore::new(&path)
            .set_item("darkMode", "true")
            .unwrap();

        let store = FilePreferenceStore::new(&path);
        assert_eq!(store.get_item("darkMode").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn test_keys_are_independent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(temp_dir.path().join("preferences.json"));

        store.set_item("darkMode", "true").unwrap();
        store.set_item("fontSize", "14").unwrap();
        store.set_item("darkMode", "false").unwrap();

        assert_eq!(store.get_item("darkMode").unwrap().as_deref(), Some("false"));
        assert_eq!(store.get_item("fontSize").unwrap().as_deref(), Some("14"));
    }

    #[test]
    fn test_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("preferences.json");
        let store = FilePreferenceStore::new(&path);

        store.set_item("darkMode", "true").unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_corrupt_file_reads_empty_and_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");
        fs::write(&path, "{ not json").unwrap();

        let store = FilePreferenceStore::new(&path);
        assert_eq!(store.get_item("darkMode").unwrap(), None);

        store.set_item("darkMode", "true").unwrap();
        assert_eq!(store.get_item("darkMode").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn test_dark_mode_round_trip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");

        let mut dark = DarkMode::load(FilePreferenceStore::new(&path));
        assert!(!dark.is_enabled());
        dark.set(true);

        let dark = DarkMode::load(FilePreferenceStore::new(&path));
        assert!(dark.is_enabled());
    }

    #[test]
    fn test_dark_mode_corrupt_value_in_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");
        fs::write(&path, r#"{"darkMode": "maybe"}"#).unwrap();

        let dark = DarkMode::load(FilePreferenceStore::new(&path));
        assert!(!dark.is_enabled());
    }
}
