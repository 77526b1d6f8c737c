//! Application state and logic

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use todo_core::{
    validate_text, DarkMode, Filter, Item, ItemId, ListState, ListSyncStore, PreferenceStore,
    RemoteCollectionClient,
};

/// How long a status message stays visible
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigating the list
    Normal,
    /// Typing into the new-task input
    Editing,
}

/// Completion notices from background requests
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    Loaded(bool),
    Added(Option<Item>),
    Toggled(ItemId, Option<Item>),
    Deleted(ItemId, bool),
}

/// Application state
pub struct App<C, P> {
    /// Task list shared with in-flight requests
    pub store: Arc<ListSyncStore<C>>,
    /// Dark mode preference
    pub dark_mode: DarkMode<P>,
    /// API server shown in the header
    pub api_url: String,
    /// Whether the app should exit
    pub should_quit: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Selected row in the filtered view
    pub selected: usize,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Blocking error shown in a modal until a key is pressed
    pub error: Option<String>,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Requests sent but not yet answered
    pub pending: usize,
    events: mpsc::UnboundedSender<TaskEvent>,
}

impl<C, P> App<C, P>
where
    C: RemoteCollectionClient + 'static,
    P: PreferenceStore,
{
    /// Create the app and the receiver its background requests report to
    pub fn new(
        store: ListSyncStore<C>,
        dark_mode: DarkMode<P>,
        api_url: impl Into<String>,
    ) -> (Self, mpsc::UnboundedReceiver<TaskEvent>) {
        let (events, event_rx) = mpsc::unbounded_channel();
        let app = Self {
            store: Arc::new(store),
            dark_mode,
            api_url: api_url.into(),
            should_quit: false,
            input_mode: InputMode::Normal,
            selected: 0,
            status_message: None,
            status_message_time: None,
            error: None,
            show_help: false,
            pending: 0,
            events,
        };
        (app, event_rx)
    }

    /// Current state for rendering
    pub fn snapshot(&self) -> ListState {
        self.store.snapshot()
    }

    /// Items in the current filtered view
    pub fn visible_items(&self) -> Vec<Item> {
        self.store.filtered_view()
    }

    pub fn selected_item(&self) -> Option<Item> {
        self.visible_items().into_iter().nth(self.selected)
    }

    // ==================== Requests ====================

    /// Run a request in the background and report its outcome
    fn spawn<F, Fut>(&mut self, request: F)
    where
        F: FnOnce(Arc<ListSyncStore<C>>) -> Fut,
        Fut: std::future::Future<Output = TaskEvent> + Send + 'static,
    {
        self.pending += 1;
        let events = self.events.clone();
        let fut = request(self.store.clone());
        tokio::spawn(async move {
            let _ = events.send(fut.await);
        });
    }

    /// Fetch the whole list again
    pub fn reload(&mut self) {
        self.spawn(|store| async move { TaskEvent::Loaded(store.load_all().await) });
    }

    /// Submit the input line as a new task
    ///
    /// Empty input opens the error modal and sends nothing.
    pub fn submit_input(&mut self) {
        if let Err(e) = validate_text(&self.store.draft()) {
            self.set_error(e.to_string());
            return;
        }

        self.spawn(|store| async move {
            TaskEvent::Added(store.submit_draft().await.ok().flatten())
        });
    }

    /// Toggle the selected task
    pub fn toggle_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        self.spawn(|store| async move {
            let result = store.toggle_item(&item.id).await;
            TaskEvent::Toggled(item.id, result)
        });
    }

    /// Delete the selected task
    pub fn delete_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        self.spawn(|store| async move {
            let deleted = store.delete_item(&item.id).await;
            TaskEvent::Deleted(item.id, deleted)
        });
    }

    /// Apply a completion notice
    pub fn handle_event(&mut self, event: TaskEvent) {
        self.pending = self.pending.saturating_sub(1);

        match event {
            TaskEvent::Loaded(true) => {}
            TaskEvent::Loaded(false) => {
                self.set_status(format!("Failed to fetch tasks from {}", self.api_url))
            }
            TaskEvent::Added(Some(item)) => self.set_status(format!("Added: {}", item.text)),
            TaskEvent::Added(None) => self.set_status("Failed to add task"),
            TaskEvent::Toggled(_, Some(_)) => {}
            TaskEvent::Toggled(id, None) => self.set_status(format!("Failed to toggle task {}", id)),
            TaskEvent::Deleted(_, true) => self.set_status("Task deleted"),
            TaskEvent::Deleted(id, false) => {
                self.set_status(format!("Failed to delete task {}", id))
            }
        }

        self.clamp_selection();
    }

    // ==================== Local State ====================

    pub fn set_filter(&mut self, filter: Filter) {
        self.store.set_filter(filter);
        self.clamp_selection();
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.store.filter().next());
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode.toggle();
    }

    pub fn is_dark(&self) -> bool {
        self.dark_mode.is_enabled()
    }

    pub fn start_editing(&mut self) {
        self.input_mode = InputMode::Editing;
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        self.store.update_draft(|draft| draft.push(c));
    }

    pub fn input_backspace(&mut self) {
        self.store.update_draft(|draft| {
            draft.pop();
        });
    }

    pub fn clear_input(&mut self) {
        self.store.set_draft("");
    }

    // ==================== Navigation ====================

    pub fn move_down(&mut self) {
        let len = self.visible_items().len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_to_top(&mut self) {
        self.selected = 0;
    }

    pub fn move_to_bottom(&mut self) {
        self.selected = self.visible_items().len().saturating_sub(1);
    }

    /// Keep the selection inside the filtered view
    fn clamp_selection(&mut self) {
        let len = self.visible_items().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    // ==================== Messages ====================

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}
