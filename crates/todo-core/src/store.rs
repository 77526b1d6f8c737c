//! Synchronised task list
//!
//! `ListSyncStore` keeps a local `ListState` consistent with the remote
//! collection. Local state changes only after the server confirms an
//! operation, and always from the server's response where there is one.
//!
//! ## Failures
//!
//! Remote failures are logged and absorbed: the operation simply does not
//! take effect locally. Empty task text is the only error returned to the
//! caller, and it is raised before any request is made.
//!
//! ## Concurrency
//!
//! All methods take `&self`. The state lock is held only while applying a
//! result, never across a request, so operations can overlap freely. Two
//! overlapping operations on the same id resolve in response order.
//!
//! ## Usage
//!
//! ```ignore
//! let store = ListSyncStore::new(HttpCollectionClient::new(&config.api_url)?);
//!
//! store.load_all().await;
//! store.add_item("buy milk").await?;
//!
//! store.set_filter(Filter::Pending);
//! for item in store.filtered_view() { ... }
//! ```

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::error::ValidationError;
use crate::models::{Filter, Item, ItemId, NewItem};
use crate::remote::RemoteCollectionClient;
use crate::state::ListState;

/// Reject task text that is empty once trimmed
pub fn validate_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        Err(ValidationError::EmptyText)
    } else {
        Ok(())
    }
}

/// Local task list backed by a remote collection
pub struct ListSyncStore<C> {
    client: C,
    state: RwLock<ListState>,
}

impl<C: RemoteCollectionClient> ListSyncStore<C> {
    /// Create an empty store; nothing is fetched until `load_all`
    pub fn new(client: C) -> Self {
        Self {
            client,
            state: RwLock::new(ListState::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ListState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ListState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ==================== Remote Operations ====================

    /// Fetch the whole collection and replace the local list
    ///
    /// `loading` is true while any fetch is in flight; each call settles its
    /// own share however it ends, including when the future is dropped. On failure the
    /// previous list is kept. Returns true if the list was replaced.
    pub async fn load_all(&self) -> bool {
        self.write().begin_load();
        let _loading = LoadingGuard { state: &self.state };

        match self.client.list().await {
            Ok(items) => {
                info!("Tasks fetched: {}", items.len());
                self.write().replace_all(items);
                true
            }
            Err(e) => {
                warn!("Error fetching tasks: {}", e);
                false
            }
        }
    }

    /// Create a task from `text` and append the server's copy
    ///
    /// Whitespace-only text is rejected without a request. On success the
    /// input buffer is cleared; on remote failure it is left alone and
    /// `Ok(None)` is returned.
    pub async fn add_item(&self, text: &str) -> Result<Option<Item>, ValidationError> {
        validate_text(text)?;

        match self.client.create(&NewItem::new(text)).await {
            Ok(item) => {
                debug!("Task added: {}", item.id);
                let mut state = self.write();
                state.append(item.clone());
                state.clear_draft();
                Ok(Some(item))
            }
            Err(e) => {
                warn!("Error adding task: {}", e);
                Ok(None)
            }
        }
    }

    /// Submit the current input buffer through `add_item`
    pub async fn submit_draft(&self) -> Result<Option<Item>, ValidationError> {
        let text = self.draft();
        self.add_item(&text).await
    }

    /// Toggle a task and take the server's copy as the new local item
    ///
    /// If `id` is not in the local list the server copy is not inserted.
    pub async fn toggle_item(&self, id: &ItemId) -> Option<Item> {
        match self.client.toggle(id).await {
            Ok(item) => {
                if !self.write().replace(item.clone()) {
                    debug!("Toggled task {} is not in the local list", id);
                }
                Some(item)
            }
            Err(e) => {
                warn!("Error toggling task {}: {}", id, e);
                None
            }
        }
    }

    /// Delete a task, removing it locally once the server confirms
    pub async fn delete_item(&self, id: &ItemId) -> bool {
        match self.client.delete(id).await {
            Ok(()) => {
                if !self.write().remove(id) {
                    debug!("Deleted task {} was not in the local list", id);
                }
                true
            }
            Err(e) => {
                warn!("Error deleting task {}: {}", id, e);
                false
            }
        }
    }

    // ==================== Local State ====================

    pub fn set_filter(&self, filter: Filter) {
        self.write().set_filter(filter);
    }

    pub fn filter(&self) -> Filter {
        self.read().filter()
    }

    /// Items passing the current filter, in list order
    pub fn filtered_view(&self) -> Vec<Item> {
        self.read().filtered_view().cloned().collect()
    }

    /// All items in list order
    pub fn items(&self) -> Vec<Item> {
        self.read().items().to_vec()
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading()
    }

    pub fn draft(&self) -> String {
        self.read().draft().to_string()
    }

    pub fn set_draft(&self, draft: impl Into<String>) {
        self.write().set_draft(draft);
    }

    /// Edit the input buffer in place
    pub fn update_draft<F: FnOnce(&mut String)>(&self, f: F) {
        f(self.write().draft_mut());
    }

    /// Copy of the whole state for rendering
    pub fn snapshot(&self) -> ListState {
        self.read().clone()
    }
}

/// Settles one in-flight fetch when dropped
struct LoadingGuard<'a> {
    state: &'a RwLock<ListState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .finish_load();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tokio::sync::{Notify, Semaphore};
    use tokio::task::JoinSet;

    use crate::error::RemoteError;

    /// Reference collection standing in for the server
    #[derive(Default)]
    struct InMemoryCollection {
        items: Mutex<Vec<Item>>,
        next_id: AtomicUsize,
        fail: AtomicBool,
        calls: AtomicUsize,
        /// Extra field stamped on every toggle response
        toggle_stamp: Mutex<Option<String>>,
    }

    impl InMemoryCollection {
        fn with_items(items: Vec<Item>) -> Arc<Self> {
            let next = items.len();
            let collection = Self::default();
            *collection.items.lock().unwrap() = items;
            collection.next_id.store(next, Ordering::SeqCst);
            Arc::new(collection)
        }

        fn set_failing(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn ids(&self) -> HashSet<ItemId> {
            self.items
                .lock()
                .unwrap()
                .iter()
                .map(|item| item.id.clone())
                .collect()
        }

        fn check(&self) -> Result<(), RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                Err(RemoteError::Status {
                    status: 503,
                    url: "memory://todo/tasks/".to_string(),
                    body: "unavailable".to_string(),
                })
            } else {
                Ok(())
            }
        }

        fn not_found(id: &ItemId) -> RemoteError {
            RemoteError::Status {
                status: 404,
                url: format!("memory://todo/tasks/{}/", id),
                body: String::new(),
            }
        }
    }

    #[async_trait]
    impl RemoteCollectionClient for InMemoryCollection {
        async fn list(&self) -> Result<Vec<Item>, RemoteError> {
            self.check()?;
            Ok(self.items.lock().unwrap().clone())
        }

        async fn create(&self, item: &NewItem) -> Result<Item, RemoteError> {
            self.check()?;
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
            let created = Item::new(id, item.text.clone());
            self.items.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn toggle(&self, id: &ItemId) -> Result<Item, RemoteError> {
            self.check()?;
            let stamp = self.toggle_stamp.lock().unwrap().clone();
            let mut items = self.items.lock().unwrap();
            let item = items
                .iter_mut()
                .find(|item| &item.id == id)
                .ok_or_else(|| Self::not_found(id))?;
            item.completed = !item.completed;
            if let Some(stamp) = stamp {
                item.extra
                    .insert("toggled_by".to_string(), serde_json::json!(stamp));
            }
            Ok(item.clone())
        }

        async fn delete(&self, id: &ItemId) -> Result<(), RemoteError> {
            self.check()?;
            let mut items = self.items.lock().unwrap();
            let before = items.len();
            items.retain(|item| &item.id != id);
            if items.len() == before {
                return Err(Self::not_found(id));
            }
            Ok(())
        }
    }

    fn seeded() -> Arc<InMemoryCollection> {
        InMemoryCollection::with_items(vec![
            Item::new(1, "write report").with_completed(true),
            Item::new(2, "buy milk"),
            Item::new(3, "call mum"),
        ])
    }

    fn local_ids<C: RemoteCollectionClient>(store: &ListSyncStore<C>) -> HashSet<ItemId> {
        store.items().into_iter().map(|item| item.id).collect()
    }

    #[tokio::test]
    async fn test_load_all_replaces_list() {
        let remote = seeded();
        let store = ListSyncStore::new(remote.clone());

        assert!(store.items().is_empty());
        assert!(store.load_all().await);
        assert_eq!(store.items().len(), 3);
        assert_eq!(store.items()[0].id, ItemId::from(1));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_load_all_failure_keeps_list_and_clears_loading() {
        let remote = InMemoryCollection::with_items(Vec::new());
        remote.set_failing(true);
        let store = ListSyncStore::new(remote.clone());

        assert!(!store.load_all().await);
        assert!(!store.is_loading());
        assert!(store.items().is_empty());

        // Populated list survives a later failed reload
        remote.set_failing(false);
        store.add_item("buy milk").await.unwrap();
        remote.set_failing(true);
        assert!(!store.load_all().await);
        assert_eq!(store.items().len(), 1);
        assert!(!store.is_loading());
    }

    /// Client whose list call waits until released
    struct GatedCollection {
        inner: Arc<InMemoryCollection>,
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl RemoteCollectionClient for GatedCollection {
        async fn list(&self) -> Result<Vec<Item>, RemoteError> {
            self.gate.notified().await;
            self.inner.list().await
        }

        async fn create(&self, item: &NewItem) -> Result<Item, RemoteError> {
            self.inner.create(item).await
        }

        async fn toggle(&self, id: &ItemId) -> Result<Item, RemoteError> {
            self.inner.toggle(id).await
        }

        async fn delete(&self, id: &ItemId) -> Result<(), RemoteError> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn test_loading_true_while_in_flight() {
        let gate = Arc::new(Notify::new());
        let store = Arc::new(ListSyncStore::new(GatedCollection {
            inner: seeded(),
            gate: gate.clone(),
        }));

        let task = tokio::spawn({
            let store = store.clone();
            async move { store.load_all().await }
        });

        while !store.is_loading() {
            tokio::task::yield_now().await;
        }
        // Other operations are not blocked by the pending load
        store.set_filter(Filter::Pending);
        assert!(store.add_item("while loading").await.unwrap().is_some());

        gate.notify_one();
        assert!(task.await.unwrap());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_loading_reset_when_load_is_dropped() {
        let gate = Arc::new(Notify::new());
        let store = ListSyncStore::new(GatedCollection {
            inner: seeded(),
            gate,
        });

        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(20), store.load_all()).await;
        assert!(timed_out.is_err());
        assert!(!store.is_loading());
    }

    /// Client whose list calls each wait for their own permit
    struct QueuedCollection {
        inner: Arc<InMemoryCollection>,
        permits: Arc<Semaphore>,
        entered: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RemoteCollectionClient for QueuedCollection {
        async fn list(&self) -> Result<Vec<Item>, RemoteError> {
            self.entered.fetch_add(1, Ordering::SeqCst);
            self.permits.acquire().await.unwrap().forget();
            self.inner.list().await
        }

        async fn create(&self, item: &NewItem) -> Result<Item, RemoteError> {
            self.inner.create(item).await
        }

        async fn toggle(&self, id: &ItemId) -> Result<Item, RemoteError> {
            self.inner.toggle(id).await
        }

        async fn delete(&self, id: &ItemId) -> Result<(), RemoteError> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn test_loading_stays_true_until_last_load_finishes() {
        let permits = Arc::new(Semaphore::new(0));
        let entered = Arc::new(AtomicUsize::new(0));
        let store = Arc::new(ListSyncStore::new(QueuedCollection {
            inner: seeded(),
            permits: permits.clone(),
            entered: entered.clone(),
        }));

        let mut loads = JoinSet::new();
        for _ in 0..2 {
            let store = store.clone();
            loads.spawn(async move { store.load_all().await });
        }
        while entered.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }

        permits.add_permits(1);
        assert!(loads.join_next().await.unwrap().unwrap());
        assert!(store.is_loading());
        assert_eq!(store.items().len(), 3);

        permits.add_permits(1);
        assert!(loads.join_next().await.unwrap().unwrap());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_add_empty_text_makes_no_request() {
        let remote = seeded();
        let store = ListSyncStore::new(remote.clone());
        store.load_all().await;
        let calls = remote.calls();

        for text in ["", "   ", "\t\n"] {
            assert_eq!(store.add_item(text).await, Err(ValidationError::EmptyText));
        }
        assert_eq!(remote.calls(), calls);
        assert_eq!(store.items().len(), 3);
    }

    #[tokio::test]
    async fn test_add_appends_server_item() {
        let remote = seeded();
        let store = ListSyncStore::new(remote.clone());
        store.load_all().await;
        let before = store.items().len();

        let added = store.add_item("buy milk").await.unwrap().unwrap();

        let items = store.items();
        assert_eq!(items.len(), before + 1);
        let last = items.last().unwrap();
        assert_eq!(last.text, "buy milk");
        assert!(!last.completed);
        assert_eq!(last, &added);
        assert_eq!(added.id, ItemId::from(4));
    }

    #[tokio::test]
    async fn test_add_clears_draft_only_on_success() {
        let remote = seeded();
        let store = ListSyncStore::new(remote.clone());

        store.set_draft("buy milk");
        remote.set_failing(true);
        assert_eq!(store.submit_draft().await, Ok(None));
        assert_eq!(store.draft(), "buy milk");
        assert!(store.items().is_empty());

        remote.set_failing(false);
        let added = store.submit_draft().await.unwrap().unwrap();
        assert_eq!(added.text, "buy milk");
        assert_eq!(store.draft(), "");
    }

    #[tokio::test]
    async fn test_submit_blank_draft_is_rejected() {
        let remote = seeded();
        let store = ListSyncStore::new(remote.clone());
        store.update_draft(|draft| draft.push_str("   "));

        assert_eq!(store.submit_draft().await, Err(ValidationError::EmptyText));
        assert_eq!(remote.calls(), 0);
        assert_eq!(store.draft(), "   ");
    }

    #[tokio::test]
    async fn test_toggle_takes_server_copy() {
        let remote = seeded();
        *remote.toggle_stamp.lock().unwrap() = Some("server".to_string());
        let store = ListSyncStore::new(remote.clone());
        store.load_all().await;

        let id = ItemId::from(2);
        let server_item = store.toggle_item(&id).await.unwrap();
        assert!(server_item.completed);

        let local = store.items().into_iter().find(|item| item.id == id).unwrap();
        assert_eq!(local, server_item);
        assert_eq!(local.extra.get("toggled_by"), Some(&serde_json::json!("server")));
        // Order unchanged
        assert_eq!(store.items()[1].id, id);
    }

    #[tokio::test]
    async fn test_toggle_failure_leaves_list() {
        let remote = seeded();
        let store = ListSyncStore::new(remote.clone());
        store.load_all().await;
        let before = store.items();

        remote.set_failing(true);
        assert!(store.toggle_item(&ItemId::from(2)).await.is_none());
        assert_eq!(store.items(), before);
    }

    #[tokio::test]
    async fn test_toggle_unknown_local_id_does_not_insert() {
        let remote = seeded();
        let store = ListSyncStore::new(remote.clone());

        // Server knows the id, local list is still empty
        assert!(store.toggle_item(&ItemId::from(1)).await.is_some());
        assert!(store.items().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_after_confirmation() {
        let remote = seeded();
        let store = ListSyncStore::new(remote.clone());
        store.load_all().await;

        assert!(store.delete_item(&ItemId::from(2)).await);
        assert_eq!(store.items().len(), 2);
        assert!(!local_ids(&store).contains(&ItemId::from(2)));
    }

    #[tokio::test]
    async fn test_delete_failure_leaves_list() {
        let remote = seeded();
        let store = ListSyncStore::new(remote.clone());
        store.load_all().await;

        remote.set_failing(true);
        assert!(!store.delete_item(&ItemId::from(2)).await);
        assert_eq!(store.items().len(), 3);

        // Unknown id: server rejects, nothing changes
        remote.set_failing(false);
        assert!(!store.delete_item(&ItemId::from(42)).await);
        assert_eq!(store.items().len(), 3);
    }

    #[tokio::test]
    async fn test_ids_track_reference_collection() {
        let remote = InMemoryCollection::with_items(Vec::new());
        let store = ListSyncStore::new(remote.clone());
        store.load_all().await;

        let a = store.add_item("a").await.unwrap().unwrap();
        let b = store.add_item("b").await.unwrap().unwrap();
        assert_eq!(local_ids(&store), remote.ids());

        store.toggle_item(&a.id).await;
        assert_eq!(local_ids(&store), remote.ids());

        let c = store.add_item("c").await.unwrap().unwrap();
        store.delete_item(&b.id).await;
        assert_eq!(local_ids(&store), remote.ids());

        store.toggle_item(&c.id).await;
        store.delete_item(&a.id).await;
        assert_eq!(local_ids(&store), remote.ids());
        assert_eq!(store.items(), remote.items.lock().unwrap().clone());
    }

    #[tokio::test]
    async fn test_overlapping_operations_on_different_ids() {
        let remote = seeded();
        let store = ListSyncStore::new(remote.clone());
        store.load_all().await;

        let id2 = ItemId::from(2);
        let id3 = ItemId::from(3);
        let (toggled, deleted, added) = tokio::join!(
            store.toggle_item(&id2),
            store.delete_item(&id3),
            store.add_item("new"),
        );

        assert!(toggled.unwrap().completed);
        assert!(deleted);
        assert!(added.unwrap().is_some());
        assert_eq!(local_ids(&store), remote.ids());
    }

    #[tokio::test]
    async fn test_filtered_view() {
        let remote = seeded();
        let store = ListSyncStore::new(remote.clone());
        store.load_all().await;

        assert_eq!(store.filter(), Filter::All);
        assert_eq!(store.filtered_view(), store.items());

        store.set_filter(Filter::Completed);
        let done: Vec<ItemId> = store.filtered_view().into_iter().map(|i| i.id).collect();
        assert_eq!(done, vec![ItemId::from(1)]);

        store.set_filter(Filter::Pending);
        let open: Vec<ItemId> = store.filtered_view().into_iter().map(|i| i.id).collect();
        assert_eq!(open, vec![ItemId::from(2), ItemId::from(3)]);

        // View follows list changes
        store.toggle_item(&ItemId::from(2)).await;
        let open: Vec<ItemId> = store.filtered_view().into_iter().map(|i| i.id).collect();
        assert_eq!(open, vec![ItemId::from(3)]);
    }

    #[tokio::test]
    async fn test_set_filter_makes_no_request() {
        let remote = seeded();
        let store = ListSyncStore::new(remote.clone());

        store.set_filter(Filter::Completed);
        store.set_filter(Filter::Pending);
        assert_eq!(remote.calls(), 0);
    }

    #[test]
    fn test_validate_text() {
        assert!(validate_text("buy milk").is_ok());
        assert!(validate_text("  x  ").is_ok());
        assert_eq!(validate_text(""), Err(ValidationError::EmptyText));
        assert_eq!(validate_text(" \t "), Err(ValidationError::EmptyText));
    }
}
