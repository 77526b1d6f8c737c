//! Task command handlers

use anyhow::{bail, Result};

use todo_core::{Config, Filter, ItemId};

use super::open_store;
use crate::output::Output;
use crate::prompt::confirm;

/// List tasks under a filter
pub async fn list(config: &Config, filter: Filter, output: &Output) -> Result<()> {
    let store = open_store(config)?;

    if !store.load_all().await {
        bail!("Failed to fetch tasks from {}", config.api_url);
    }

    store.set_filter(filter);
    output.print_items(&store.filtered_view(), filter);
    Ok(())
}

/// Add a task
pub async fn add(config: &Config, text: String, output: &Output) -> Result<()> {
    let store = open_store(config)?;

    match store.add_item(&text).await? {
        Some(item) => {
            output.success(&format!("Added task {}", item.id));
            output.print_item(&item);
            Ok(())
        }
        None => bail!("Failed to add task on {}", config.api_url),
    }
}

/// Toggle a task's completion
pub async fn toggle(config: &Config, id: ItemId, output: &Output) -> Result<()> {
    let store = open_store(config)?;

    let Some(item) = store.toggle_item(&id).await else {
        bail!("Failed to toggle task {}", id);
    };

    let state = if item.completed { "done" } else { "not done" };
    output.success(&format!("Marked task {} {}", item.id, state));
    output.print_item(&item);
    Ok(())
}

/// Delete a task
pub async fn delete(config: &Config, id: ItemId, yes: bool, output: &Output) -> Result<()> {
    let store = open_store(config)?;

    // Confirm deletion
    if output.should_prompt() && !yes {
        store.load_all().await;
        let subject = match store.items().into_iter().find(|item| item.id == id) {
            Some(item) => format!("Delete task: {} - {}", item.id, item.text),
            None => format!("Delete task: {}", id),
        };
        println!("{}", subject);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if !store.delete_item(&id).await {
        bail!("Failed to delete task {}", id);
    }

    output.success(&format!("Deleted task {}", id));
    Ok(())
}
