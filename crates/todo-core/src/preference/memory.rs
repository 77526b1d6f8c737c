//! In-memory preference store

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::PreferenceStore;
use crate::error::PreferenceError;

/// Preferences that last only as long as the process
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(store.get_item("theme").unwrap(), None);

        store.set_item("theme", "\"dark\"").unwrap();
        assert_eq!(store.get_item("theme").unwrap().as_deref(), Some("\"dark\""));

        store.set_item("theme", "\"light\"").unwrap();
        assert_eq!(store.get_item("theme").unwrap().as_deref(), Some("\"light\""));
    }
}
