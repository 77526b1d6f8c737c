//! Client-only preferences
//!
//! Preferences live in a string key/value store, the same shape as browser
//! local storage: values are strings, typically JSON-encoded.
//!
//! - `FilePreferenceStore`: a JSON file under the data directory
//! - `MemoryPreferenceStore`: in-process only
//!
//! `DarkMode` is the one preference the task view has.

mod file;
mod memory;

use tracing::{debug, warn};

use crate::error::PreferenceError;

pub use file::FilePreferenceStore;
pub use memory::MemoryPreferenceStore;

/// String key/value persistence
pub trait PreferenceStore: Send + Sync {
    /// Read a stored value, `None` if the key was never written
    fn get_item(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    /// Store a value, replacing any previous one
    fn set_item(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for &T {
    fn get_item(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        (**self).set_item(key, value)
    }
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for std::sync::Arc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        (**self).set_item(key, value)
    }
}

/// Dark mode display preference
///
/// Read once when created; every change is written straight back. Values
/// that are missing or are not a JSON boolean read as `false`.
#[derive(Debug)]
pub struct DarkMode<S> {
    store: S,
    enabled: bool,
}

impl<S: PreferenceStore> DarkMode<S> {
    /// Storage key
    pub const KEY: &'static str = "darkMode";

    /// Load the preference from `store`
    pub fn load(store: S) -> Self {
        let enabled = match store.get_item(Self::KEY) {
            Ok(Some(raw)) => parse_flag(&raw),
            Ok(None) => false,
            Err(e) => {
                warn!("Could not read dark mode preference: {}", e);
                false
            }
        };

        Self { store, enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set and persist the preference
    ///
    /// A failed write is logged; the in-memory value still changes.
    pub fn set(&mut self, enabled: bool) {
        self.enabled = enabled;
        let value = if enabled { "true" } else { "false" };
        if let Err(e) = self.store.set_item(Self::KEY, value) {
            warn!("Could not save dark mode preference: {}", e);
        }
    }

    /// Flip the preference, returning the new value
    pub fn toggle(&mut self) -> bool {
        self.set(!self.enabled);
        self.enabled
    }

    /// Button label for the current mode
    pub fn label(&self) -> &'static str {
        if self.enabled {
            "🌙 Dark Mode"
        } else {
            "🔆 Light Mode"
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Decode a stored JSON boolean
fn parse_flag(raw: &str) -> bool {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Bool(b)) => b,
        Ok(other) => {
            debug!("Ignoring non-boolean dark mode value: {}", other);
            false
        }
        Err(_) => {
            debug!("Ignoring malformed dark mode value: {:?}", raw);
            false
        }
    }
}
