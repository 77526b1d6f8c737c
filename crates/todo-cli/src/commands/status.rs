//! Status command handler

use anyhow::Result;

use todo_core::Config;

use super::{open_dark_mode, open_store};
use crate::output::{Output, OutputFormat};

/// Show status information
pub async fn show(config: &Config, output: &Output) -> Result<()> {
    let store = open_store(config)?;
    let reachable = store.load_all().await;
    let state = store.snapshot();
    let dark = open_dark_mode(config);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "api_url": config.api_url,
                    "reachable": reachable,
                    "tasks": {
                        "total": state.len(),
                        "completed": state.completed_count(),
                        "pending": state.len() - state.completed_count()
                    },
                    "dark_mode": dark.is_enabled(),
                    "data_dir": config.data_dir
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", if reachable { "online" } else { "offline" });
        }
        OutputFormat::Human => {
            println!("todo Status");
            println!("===========");
            println!();
            println!("Server:");
            println!("  URL:    {}", config.api_url);
            println!(
                "  Status: {}",
                if reachable { "reachable" } else { "unreachable" }
            );
            println!();
            if reachable {
                println!("Tasks:");
                println!("  Total:     {}", state.len());
                println!("  Completed: {}", state.completed_count());
                println!("  Pending:   {}", state.len() - state.completed_count());
                println!();
            }
            println!("Preferences:");
            println!("  Theme: {}", dark.label());
            println!("  Location: {}", config.preferences_path().display());
        }
    }

    Ok(())
}
