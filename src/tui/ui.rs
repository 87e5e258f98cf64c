use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use super::app::{AddField, App, EditField, InputMode};
use super::theme::{category_color, palette, priority_color, Palette};
use crate::commands::empty_message;
use crate::filter::Filter;
use crate::storage::KeyValueStore;

pub fn ui<K: KeyValueStore>(f: &mut Frame, app: &mut App<K>) {
    let dark = app.store.dark_mode();
    let pal = palette(dark);
    let base = Style::default().fg(pal.fg).bg(pal.bg);
    f.render_widget(Block::default().style(base), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header + stats
            Constraint::Length(3), // Filters
            Constraint::Length(3), // Search
            Constraint::Min(0),    // Tasks
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    render_header(f, app, pal, chunks[0]);
    render_filters(f, app, pal, chunks[1]);
    render_search(f, app, pal, chunks[2]);
    render_tasks(f, app, pal, chunks[3]);
    render_help(f, app, pal, chunks[4]);

    match app.input_mode {
        InputMode::Adding => render_add_form(f, app, pal),
        InputMode::Editing => render_edit_form(f, app, pal),
        _ => {}
    }
}

fn render_header<K: KeyValueStore>(f: &mut Frame, app: &App<K>, pal: Palette, area: Rect) {
    let s = app.store.stats();
    let line = Line::from(vec![
        Span::styled("Total ", Style::default().fg(pal.muted)),
        Span::styled(s.total.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled("Completed ", Style::default().fg(pal.muted)),
        Span::styled(s.completed.to_string(), Style::default().fg(pal.completed)),
        Span::raw("   "),
        Span::styled("Active ", Style::default().fg(pal.muted)),
        Span::styled(s.active.to_string(), Style::default().fg(pal.active)),
        Span::raw("   "),
        Span::styled("High Priority ", Style::default().fg(pal.muted)),
        Span::styled(s.high.to_string(), Style::default().fg(pal.high)),
    ]);
    let theme_hint = if app.store.dark_mode() { "dark" } else { "light" };
    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Task Manager Pro - Stay organized and productive ({})", theme_hint)),
    );
    f.render_widget(header, area);
}

fn render_filters<K: KeyValueStore>(f: &mut Frame, app: &App<K>, pal: Palette, area: Rect) {
    let current = app.store.filter();
    let mut spans = Vec::new();
    for (i, filter) in Filter::presets().iter().enumerate() {
        let style = if filter == current {
            Style::default()
                .fg(pal.bg)
                .bg(pal.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(pal.fg)
        };
        spans.push(Span::styled(format!(" {}:{} ", i + 1, filter.label()), style));
        spans.push(Span::raw(" "));
    }
    let bar = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Filter"));
    f.render_widget(bar, area);
}

fn render_search<K: KeyValueStore>(f: &mut Frame, app: &App<K>, pal: Palette, area: Rect) {
    let searching = app.input_mode == InputMode::Search;
    let text = if app.store.search().is_empty() && !searching {
        Span::styled("Search tasks...", Style::default().fg(pal.muted))
    } else {
        Span::raw(app.store.search().to_string())
    };
    let border = if searching { pal.accent } else { pal.muted };
    let search = Paragraph::new(Line::from(text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title("Search"),
    );
    f.render_widget(search, area);
}

fn render_tasks<K: KeyValueStore>(f: &mut Frame, app: &mut App<K>, pal: Palette, area: Rect) {
    let dark = app.store.dark_mode();
    let visible = app.store.visible();

    if visible.is_empty() {
        let msg = empty_message(app.store.filter(), app.store.search());
        let empty = Paragraph::new(msg)
            .style(Style::default().fg(pal.muted))
            .block(Block::default().borders(Borders::ALL).title("Tasks"));
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = visible
        .iter()
        .map(|t| {
            let check = if t.completed { "[x]" } else { "[ ]" };
            let title_style = if t.completed {
                Style::default()
                    .fg(pal.muted)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(pal.fg)
            };
            let due = if t.due_date.is_empty() {
                String::new()
            } else {
                format!("Due: {}", t.due_date)
            };
            Row::new(vec![
                Cell::from(check),
                Cell::from(Span::styled(t.title.clone(), title_style)),
                Cell::from(Span::styled(
                    t.priority.to_string(),
                    Style::default().fg(priority_color(t.priority, dark)),
                )),
                Cell::from(Span::styled(
                    t.category.to_string(),
                    Style::default().fg(category_color(t.category, dark)),
                )),
                Cell::from(due),
                Cell::from(Span::styled(t.description.clone(), Style::default().fg(pal.muted))),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(20),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["", "Title", "Priority", "Category", "Due", "Description"])
                .style(Style::default().fg(pal.accent).add_modifier(Modifier::BOLD))
                .bottom_margin(1),
        )
        .block(Block::default().borders(Borders::ALL).title("Tasks"))
        .row_highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(pal.highlight_bg),
        )
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_help<K: KeyValueStore>(f: &mut Frame, app: &App<K>, pal: Palette, area: Rect) {
    let help_text = match app.input_mode {
        InputMode::Normal => "q: Quit | a: Add | e: Edit | Space: Done | d: Del | /: Search | Tab/1-8: Filter | t: Theme",
        InputMode::Search => "Type to search | Enter/Esc: Done",
        InputMode::Adding => "Tab: Next Field | Left/Right: Change | Enter: Add Task | Esc: Cancel",
        InputMode::Editing => "Tab: Next Field | Enter: Save | Esc: Cancel",
    };
    let line = match &app.message {
        Some(msg) => Line::from(vec![
            Span::styled(msg.clone(), Style::default().fg(pal.high)),
            Span::raw(" | "),
            Span::raw(help_text),
        ]),
        None => Line::from(help_text),
    };
    let help = Paragraph::new(line)
        .style(Style::default().fg(pal.muted))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

fn field_line(label: &str, value: &str, focused: bool, pal: Palette) -> Line<'static> {
    let marker = if focused { "> " } else { "  " };
    let style = if focused {
        Style::default().fg(pal.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(pal.fg)
    };
    Line::from(vec![
        Span::styled(format!("{}{:<13}", marker, label), style),
        Span::raw(value.to_string()),
    ])
}

fn render_add_form<K: KeyValueStore>(f: &mut Frame, app: &App<K>, pal: Palette) {
    let area = centered_rect(60, 9, f.area());
    f.render_widget(Clear, area);

    let d = app.store.draft();
    let lines = vec![
        field_line("Task title *", &d.title, app.add_field == AddField::Title, pal),
        field_line("Description", &d.description, app.add_field == AddField::Description, pal),
        field_line(
            "Priority",
            &format!("< {} >", d.priority),
            app.add_field == AddField::Priority,
            pal,
        ),
        field_line(
            "Category",
            &format!("< {} >", d.category),
            app.add_field == AddField::Category,
            pal,
        ),
        field_line("Due date", &d.due_date, app.add_field == AddField::Due, pal),
        Line::from(""),
        Line::from(Span::styled(
            if app.store.can_add() { "[Enter] Add Task" } else { "Title required" },
            Style::default().fg(if app.store.can_add() { pal.completed } else { pal.muted }),
        )),
    ];

    let form = Paragraph::new(lines)
        .style(Style::default().fg(pal.fg).bg(pal.bg))
        .block(Block::default().borders(Borders::ALL).title("Create New Task"));
    f.render_widget(form, area);
}

fn render_edit_form<K: KeyValueStore>(f: &mut Frame, app: &App<K>, pal: Palette) {
    let Some(t) = app.store.editing() else {
        return;
    };
    let area = centered_rect(60, 4, f.area());
    f.render_widget(Clear, area);

    let lines = vec![
        field_line("Title", &t.title, app.edit_field == EditField::Title, pal),
        field_line("Description", &t.description, app.edit_field == EditField::Description, pal),
    ];
    let form = Paragraph::new(lines)
        .style(Style::default().fg(pal.fg).bg(pal.bg))
        .block(Block::default().borders(Borders::ALL).title("Edit Task"));
    f.render_widget(form, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
