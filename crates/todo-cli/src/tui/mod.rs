//! todo TUI
//!
//! Terminal view of the task list.
//!
//! ## Layout
//!
//! - Header: title and dark/light mode
//! - Input line for new tasks
//! - Filter bar (All, Completed, Pending)
//! - Task list, or "Loading tasks..." while the list is being fetched
//! - Status bar
//!
//! ## Keys
//!
//! - j/k or ↑/↓: Move selection
//! - g/G: First/last task
//! - Space/Enter: Toggle selected task
//! - d: Delete selected task
//! - a or i: Type a new task (Enter submits, Esc leaves)
//! - f: Next filter, 1/2/3: All/Completed/Pending
//! - D: Switch dark/light mode
//! - r: Reload
//! - ?: Help
//! - q: Quit

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use todo_core::{Config, Filter, PreferenceStore, RemoteCollectionClient};

use app::{App, InputMode, TaskEvent};

use crate::commands::{open_dark_mode, open_store};

/// Run the TUI application
pub async fn run(config: Config) -> Result<()> {
    init_tui_logging(&config);

    let store = open_store(&config)?;
    let dark_mode = open_dark_mode(&config);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let (mut app, event_rx) = App::new(store, dark_mode, config.api_url.clone());
    app.reload();

    let result = run_app(&mut terminal, &mut app, event_rx).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_app<B, C, P>(
    terminal: &mut Terminal<B>,
    app: &mut App<C, P>,
    mut event_rx: mpsc::UnboundedReceiver<TaskEvent>,
) -> Result<()>
where
    B: Backend,
    C: RemoteCollectionClient + 'static,
    P: PreferenceStore,
{
    loop {
        app.check_status_timeout();

        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            biased;

            // Finished requests
            Some(event) = event_rx.recv() => {
                app.handle_event(event);
            }

            // Poll for terminal events
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                if event::poll(Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        // Only handle key press events (not release)
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }

                        // If error modal is showing, any key dismisses it
                        if app.has_error() {
                            app.clear_error();
                            continue;
                        }

                        // If help is showing, any key dismisses it
                        if app.show_help {
                            app.show_help = false;
                            continue;
                        }

                        match app.input_mode {
                            InputMode::Normal => handle_normal_mode(app, key.code, key.modifiers),
                            InputMode::Editing => handle_editing_mode(app, key.code, key.modifiers),
                        }
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle key events in normal mode
fn handle_normal_mode<C, P>(app: &mut App<C, P>, code: KeyCode, modifiers: KeyModifiers)
where
    C: RemoteCollectionClient + 'static,
    P: PreferenceStore,
{
    match code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('g') | KeyCode::Home => app.move_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.move_to_bottom(),

        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('a') | KeyCode::Char('i') => app.start_editing(),

        KeyCode::Char('f') => app.cycle_filter(),
        KeyCode::Char('1') => app.set_filter(Filter::All),
        KeyCode::Char('2') => app.set_filter(Filter::Completed),
        KeyCode::Char('3') => app.set_filter(Filter::Pending),

        KeyCode::Char('D') => app.toggle_dark_mode(),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle key events while typing a new task
fn handle_editing_mode<C, P>(app: &mut App<C, P>, code: KeyCode, modifiers: KeyModifiers)
where
    C: RemoteCollectionClient + 'static,
    P: PreferenceStore,
{
    match code {
        KeyCode::Esc => app.stop_editing(),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => app.stop_editing(),
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => app.clear_input(),
        KeyCode::Enter => app.submit_input(),
        KeyCode::Char(c) => app.input_char(c),
        KeyCode::Backspace => app.input_backspace(),
        _ => {}
    }
}

/// Initialize logging for TUI mode
///
/// Only initializes if TODO_LOG is set. Logs go to a file because the
/// terminal belongs to the view.
fn init_tui_logging(config: &Config) {
    let Ok(log_level) = std::env::var("TODO_LOG") else {
        return;
    };

    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!("todo_core={},todo_cli={}", log_level, log_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
