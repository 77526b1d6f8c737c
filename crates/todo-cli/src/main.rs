//! todo CLI
//!
//! Command-line interface for todo - a task list kept on a remote server.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use todo_core::{Config, Filter, ItemId};

mod commands;
mod output;
mod prompt;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "todo - A to-do list backed by a task server")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file (overrides TODO_CONFIG)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// List tasks
    #[command(alias = "ls")]
    List {
        /// Which tasks to show: all, completed, pending
        #[arg(short, long, default_value = "all")]
        filter: Filter,
    },
    /// Add a task
    Add {
        /// Task text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Mark a task done, or not done
    Toggle {
        /// Task ID
        id: ItemId,
    },
    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        /// Task ID
        id: ItemId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or change the dark mode preference
    Theme {
        #[command(subcommand)]
        command: Option<ThemeCommands>,
    },
    /// Show status (server, task counts, preferences)
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum ThemeCommands {
    /// Show the current mode
    Show,
    /// Switch between dark and light
    Toggle,
    /// Use dark mode
    Dark,
    /// Use light mode
    Light,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, api_url, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work even when the config file is broken
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    // TUI is the default when no command is given
    let Some(command) = cli.command else {
        return tui::run(config).await;
    };

    if matches!(command, Commands::Tui) {
        return tui::run(config).await;
    }

    init_cli_logging();

    match command {
        Commands::Tui | Commands::Config { .. } => unreachable!(), // Handled above
        Commands::List { filter } => commands::task::list(&config, filter, &output).await,
        Commands::Add { text } => commands::task::add(&config, text.join(" "), &output).await,
        Commands::Toggle { id } => commands::task::toggle(&config, id, &output).await,
        Commands::Delete { id, yes } => commands::task::delete(&config, id, yes, &output).await,
        Commands::Theme { command } => handle_theme_command(command, &config, &output),
        Commands::Status => commands::status::show(&config, &output).await,
    }
}

fn handle_theme_command(
    command: Option<ThemeCommands>,
    config: &Config,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ThemeCommands::Show) | None => commands::theme::show(config, output),
        Some(ThemeCommands::Toggle) => commands::theme::toggle(config, output),
        Some(ThemeCommands::Dark) => commands::theme::set(config, true, output),
        Some(ThemeCommands::Light) => commands::theme::set(config, false, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Log to stderr for one-shot commands
fn init_cli_logging() {
    let directives = cli_log_directives(std::env::var("TODO_LOG").ok().as_deref());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

/// Filter directives for a TODO_LOG level
///
/// Without a level only core warnings are shown, which is where failed
/// requests are reported.
fn cli_log_directives(level: Option<&str>) -> String {
    match level {
        Some(level) => format!("todo_core={},todo_cli={}", level, level),
        None => "todo_core=warn".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_log_directives() {
        assert_eq!(cli_log_directives(None), "todo_core=warn");
        assert_eq!(
            cli_log_directives(Some("debug")),
            "todo_core=debug,todo_cli=debug"
        );
    }

    #[test]
    fn test_cli_parses_non_canonical_id_as_text() {
        let cli = Cli::try_parse_from(["todo", "rm", "007", "--yes"]).unwrap();
        match cli.command {
            Some(Commands::Delete { id, yes }) => {
                assert!(yes);
                assert_eq!(id, ItemId::Text("007".to_string()));
            }
            _ => panic!("expected delete command"),
        }
    }
}
