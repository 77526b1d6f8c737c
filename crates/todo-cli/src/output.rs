//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use todo_core::{Filter, Item};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single task
    pub fn print_item(&self, item: &Item) {
        match self.format {
            OutputFormat::Human => println!("{}", format_item(item, 60)),
            OutputFormat::Json => println!("{}", to_json(item)),
            OutputFormat::Quiet => println!("{}", item.id),
        }
    }

    /// Print the tasks visible under a filter
    pub fn print_items(&self, items: &[Item], filter: Filter) {
        match self.format {
            OutputFormat::Human => {
                if items.is_empty() {
                    match filter {
                        Filter::All => println!("No tasks yet."),
                        other => println!("No {} tasks.", other),
                    }
                    return;
                }
                for item in items {
                    println!("{}", format_item(item, 60));
                }
                let done = items.iter().filter(|item| item.completed).count();
                println!("\n{} task(s), {} done", items.len(), done);
            }
            OutputFormat::Json => println!("{}", to_json(items)),
            OutputFormat::Quiet => {
                for item in items {
                    println!("{}", item.id);
                }
            }
        }
    }

    /// Print the dark mode state
    pub fn print_dark_mode(&self, enabled: bool, label: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", label),
            OutputFormat::Json => println!("{}", serde_json::json!({ "dark_mode": enabled })),
            OutputFormat::Quiet => println!("{}", if enabled { "dark" } else { "light" }),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

/// One line per task: id, checkbox, text
pub fn format_item(item: &Item, max_text: usize) -> String {
    let check = if item.completed { "[x]" } else { "[ ]" };
    format!("{:>6} {} {}", item.id.to_string(), check, truncate(&item.text, max_text))
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        serde_json::json!({"status": "error", "message": e.to_string()}).to_string()
    })
}

/// Truncate a string to max characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
