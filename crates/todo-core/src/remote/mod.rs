//! Remote task collection
//!
//! The remote collection is the source of truth for tasks. It is reached
//! through the `RemoteCollectionClient` trait so the store can be driven by
//! the HTTP client in production and by an in-memory collection in tests.
//!
//! ## Endpoints
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | list | GET | `/todo/tasks/` |
//! | create | POST | `/todo/tasks/add/` |
//! | toggle | POST | `/todo/tasks/toggle/{id}/` |
//! | delete | DELETE | `/todo/tasks/delete/{id}/` |

mod http;

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::models::{Item, ItemId, NewItem};

pub use http::{HttpCollectionClient, DEFAULT_API_URL};

/// CRUD access to the remote task collection
#[async_trait]
pub trait RemoteCollectionClient: Send + Sync {
    /// Fetch the whole collection in server order
    async fn list(&self) -> Result<Vec<Item>, RemoteError>;

    /// Create a task, returning it with its server-assigned id
    async fn create(&self, item: &NewItem) -> Result<Item, RemoteError>;

    /// Flip a task's completion, returning the server's new copy
    async fn toggle(&self, id: &ItemId) -> Result<Item, RemoteError>;

    /// Delete a task
    async fn delete(&self, id: &ItemId) -> Result<(), RemoteError>;
}

#[async_trait]
impl<T: RemoteCollectionClient + ?Sized> RemoteCollectionClient for std::sync::Arc<T> {
    async fn list(&self) -> Result<Vec<Item>, RemoteError> {
        (**self).list().await
    }

    async fn create(&self, item: &NewItem) -> Result<Item, RemoteError> {
        (**self).create(item).await
    }

    async fn toggle(&self, id: &ItemId) -> Result<Item, RemoteError> {
        (**self).toggle(id).await
    }

    async fn delete(&self, id: &ItemId) -> Result<(), RemoteError> {
        (**self).delete(id).await
    }
}
