//! todo Core Library
//!
//! This crate keeps a local task list in step with a remote task collection
//! served over HTTP, and persists a small set of client-only preferences.
//!
//! # Architecture
//!
//! - **Remote collection**: Source of truth for tasks. Every local mutation
//!   is applied only after the server confirms it.
//! - **Preferences**: Client-only settings (dark mode) kept in a local
//!   key/value file.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let client = HttpCollectionClient::new(&config.api_url)?;
//! let store = ListSyncStore::new(client);
//!
//! store.load_all().await;
//! store.add_item("buy milk").await?;
//!
//! store.set_filter(Filter::Pending);
//! let pending = store.filtered_view();
//! ```
//!
//! # Modules
//!
//! - `store`: `ListSyncStore`, the synchronised list (main entry point)
//! - `state`: `ListState`, the plain state object and its transitions
//! - `models`: Items, ids and filters
//! - `remote`: The remote collection client trait and its HTTP implementation
//! - `preference`: Key/value preference storage and the dark-mode setting
//! - `config`: Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod preference;
pub mod remote;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{PreferenceError, RemoteError, ValidationError};
pub use models::{Filter, Item, ItemId, NewItem};
pub use preference::{DarkMode, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use remote::{HttpCollectionClient, RemoteCollectionClient};
pub use state::ListState;
pub use store::{validate_text, ListSyncStore};
