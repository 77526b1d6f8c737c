//! List state
//!
//! `ListState` is the plain data behind a task list view: the ordered items,
//! the loading flag, the active filter and the input buffer. Every change
//! goes through a small transition method so the store never pokes at fields
//! directly.

use crate::models::{Filter, Item, ItemId};

/// Local projection of the remote task collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    /// Items in server order (append order for new items)
    items: Vec<Item>,
    /// Number of full fetches in flight
    loading: usize,
    /// Read-side projection applied by `filtered_view`
    filter: Filter,
    /// Text typed but not yet submitted
    draft: String,
}

impl ListState {
    /// Empty list, not loading, showing everything
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True while at least one full fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.loading > 0
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Find an item by id
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Mark a full fetch as started
    pub fn begin_load(&mut self) {
        self.loading += 1;
    }

    /// Mark one full fetch as settled, successful or not
    pub fn finish_load(&mut self) {
        self.loading = self.loading.saturating_sub(1);
    }

    /// Replace the whole sequence with a fresh server listing
    pub fn replace_all(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    /// Append a server-created item
    pub fn append(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Swap in the server's copy of an item
    ///
    /// Every item with a matching id is replaced. Returns false when the id
    /// is not present locally, in which case nothing changes.
    pub fn replace(&mut self, item: Item) -> bool {
        let mut replaced = false;
        for slot in self.items.iter_mut().filter(|slot| slot.id == item.id) {
            *slot = item.clone();
            replaced = true;
        }
        replaced
    }

    /// Remove the item with the given id
    ///
    /// Returns false when the id is not present locally.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Mutable access to the input buffer for in-place editing
    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }

    /// Items passing the active filter, in list order
    pub fn filtered_view(&self) -> impl Iterator<Item = &Item> + '_ {
        let filter = self.filter;
        self.items.iter().filter(move |item| filter.matches(item))
    }

    /// Number of completed items
    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }
}
