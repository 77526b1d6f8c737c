//! Command handlers

pub mod config;
pub mod status;
pub mod task;
pub mod theme;

use anyhow::{Context, Result};

use todo_core::{Config, DarkMode, FilePreferenceStore, HttpCollectionClient, ListSyncStore};

/// Task list talking to the configured API server
pub fn open_store(config: &Config) -> Result<ListSyncStore<HttpCollectionClient>> {
    let client = HttpCollectionClient::new(&config.api_url)
        .with_context(|| format!("Invalid api_url in configuration: {}", config.api_url))?;
    Ok(ListSyncStore::new(client))
}

/// Dark mode preference stored under the data directory
pub fn open_dark_mode(config: &Config) -> DarkMode<FilePreferenceStore> {
    DarkMode::load(FilePreferenceStore::new(config.preferences_path()))
}
