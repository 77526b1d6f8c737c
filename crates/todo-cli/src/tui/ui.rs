//! UI rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState as ListWidgetState, Paragraph, Wrap},
    Frame,
};

use todo_core::{Filter, PreferenceStore, RemoteCollectionClient};

use super::app::{App, InputMode};
use crate::output::truncate;

/// Colours for the current mode
struct Palette {
    fg: Color,
    bg: Color,
    accent: Color,
    done: Color,
}

impl Palette {
    fn new(dark: bool) -> Self {
        if dark {
            Self {
                fg: Color::Gray,
                bg: Color::Black,
                accent: Color::Cyan,
                done: Color::DarkGray,
            }
        } else {
            Self {
                fg: Color::Black,
                bg: Color::White,
                accent: Color::Blue,
                done: Color::Gray,
            }
        }
    }

    fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }
}

/// Main UI rendering function
pub fn draw<C, P>(frame: &mut Frame, app: &App<C, P>)
where
    C: RemoteCollectionClient + 'static,
    P: PreferenceStore,
{
    let palette = Palette::new(app.is_dark());
    frame.render_widget(Block::default().style(palette.base()), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, app, &palette, chunks[0]);
    draw_input(frame, app, &palette, chunks[1]);
    draw_filter_bar(frame, app, &palette, chunks[2]);
    draw_task_list(frame, app, &palette, chunks[3]);
    draw_status_bar(frame, app, &palette, chunks[4]);

    if let Some(message) = &app.error {
        draw_error_modal(frame, message);
    } else if app.show_help {
        draw_help_overlay(frame);
    }
}

fn draw_header<C, P>(frame: &mut Frame, app: &App<C, P>, palette: &Palette, area: Rect)
where
    C: RemoteCollectionClient + 'static,
    P: PreferenceStore,
{
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(16)])
        .split(area);

    let title = Paragraph::new(Line::from(vec![Span::styled(
        "To-Do List",
        palette.base().fg(palette.accent).add_modifier(Modifier::BOLD),
    )]));
    frame.render_widget(title, halves[0]);

    let mode = Paragraph::new(app.dark_mode.label())
        .style(palette.base())
        .alignment(Alignment::Right);
    frame.render_widget(mode, halves[1]);
}

/// Draw the new-task input box
fn draw_input<C, P>(frame: &mut Frame, app: &App<C, P>, palette: &Palette, area: Rect)
where
    C: RemoteCollectionClient + 'static,
    P: PreferenceStore,
{
    let editing = app.input_mode == InputMode::Editing;
    let draft = app.store.draft();

    let content = if draft.is_empty() && !editing {
        Span::styled("Add a new task...", palette.base().add_modifier(Modifier::DIM))
    } else {
        Span::styled(draft.clone(), palette.base())
    };

    let border_style = if editing {
        palette.base().fg(palette.accent).add_modifier(Modifier::BOLD)
    } else {
        palette.base()
    };

    let block = Block::default()
        .title(" New task ")
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(Paragraph::new(Line::from(content)).block(block), area);

    if editing {
        let cursor_x = area.x + 1 + draft.chars().count() as u16;
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn draw_filter_bar<C, P>(frame: &mut Frame, app: &App<C, P>, palette: &Palette, area: Rect)
where
    C: RemoteCollectionClient + 'static,
    P: PreferenceStore,
{
    let current = app.store.filter();

    let mut spans = Vec::new();
    for (i, filter) in Filter::ALL.iter().enumerate() {
        let label = format!(" {}:{} ", i + 1, filter.label());
        let style = if *filter == current {
            palette.base().fg(palette.accent).add_modifier(Modifier::REVERSED)
        } else {
            palette.base()
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_task_list<C, P>(frame: &mut Frame, app: &App<C, P>, palette: &Palette, area: Rect)
where
    C: RemoteCollectionClient + 'static,
    P: PreferenceStore,
{
    let state = app.snapshot();
    let visible: Vec<_> = state.filtered_view().collect();

    let title = format!(" Tasks ({}/{}) ", visible.len(), state.len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(palette.base());

    if state.is_loading() {
        let paragraph = Paragraph::new("Loading tasks...")
            .style(palette.base().add_modifier(Modifier::ITALIC))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let max_len = area.width.saturating_sub(8) as usize;
    let items: Vec<ListItem> = visible
        .iter()
        .map(|item| {
            let (check, style) = if item.completed {
                (
                    "[x] ",
                    palette.base().fg(palette.done).add_modifier(Modifier::CROSSED_OUT),
                )
            } else {
                ("[ ] ", palette.base())
            };

            ListItem::new(Line::from(vec![
                Span::styled(check, palette.base()),
                Span::styled(truncate(&item.text, max_len), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        palette
            .base()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED),
    );

    let mut list_state = ListWidgetState::default();
    if !visible.is_empty() && app.input_mode == InputMode::Normal {
        list_state.select(Some(app.selected));
    }

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_status_bar<C, P>(frame: &mut Frame, app: &App<C, P>, palette: &Palette, area: Rect)
where
    C: RemoteCollectionClient + 'static,
    P: PreferenceStore,
{
    let content = if let Some(msg) = &app.status_message {
        msg.clone()
    } else if app.pending > 0 {
        format!("Waiting for {}...", app.api_url)
    } else {
        match app.input_mode {
            InputMode::Normal => {
                "a:add  space:toggle  d:del  f:filter  D:theme  r:reload  ?:help  q:quit"
                    .to_string()
            }
            InputMode::Editing => "enter:add  esc:done  ctrl-u:clear".to_string(),
        }
    };

    let paragraph = Paragraph::new(content).style(palette.base().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Centered popup area of at most `width` x `height`
fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

fn draw_error_modal(frame: &mut Frame, message: &str) {
    let area = popup_area(frame.area(), 44, 7);
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_help_overlay(frame: &mut Frame) {
    let area = popup_area(frame.area(), 46, 20);
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  j/k, ↑/↓       Move up/down"),
        Line::from("  g/G            First/last task"),
        Line::from(""),
        Line::from("Tasks:"),
        Line::from("  a, i           Type a new task"),
        Line::from("  Enter          Add it (while typing)"),
        Line::from("  Space, Enter   Toggle done"),
        Line::from("  d              Delete"),
        Line::from("  r              Reload from server"),
        Line::from(""),
        Line::from("View:"),
        Line::from("  f, 1/2/3       Filter all/completed/pending"),
        Line::from("  D              Dark/light mode"),
        Line::from("  q              Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}
