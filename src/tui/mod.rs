pub mod app;
pub mod theme;
pub mod ui;

use std::io;

use anyhow::Context;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

use crate::storage::KeyValueStore;
use crate::store::Store;
use app::{App, InputMode};
use ui::ui;

pub fn run_tui<K: KeyValueStore>(store: Store<K>) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store);
    info!(tasks = app.store.tasks().len(), "ui started");

    // Run loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = %err, "ui loop failed");
    }
    res.context("ui loop failed")
}

fn run_app<B: Backend, K: KeyValueStore>(terminal: &mut Terminal<B>, app: &mut App<K>) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match app.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char(' ') => app.toggle_selected(),
                KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                KeyCode::Char('a') => app.start_add(),
                KeyCode::Char('e') => app.start_edit_selected(),
                KeyCode::Char('/') => app.start_search(),
                KeyCode::Char('t') => app.toggle_theme(),
                KeyCode::Tab => app.cycle_filter(),
                KeyCode::Char(c @ '1'..='8') => app.select_filter(c as usize - '1' as usize),
                _ => {}
            },
            InputMode::Search | InputMode::Adding | InputMode::Editing => match key.code {
                KeyCode::Enter => app.submit(),
                KeyCode::Esc => app.cancel(),
                KeyCode::Tab => app.next_field(true),
                KeyCode::BackTab => app.next_field(false),
                KeyCode::Left => app.cycle_selector(false),
                KeyCode::Right => app.cycle_selector(true),
                KeyCode::Char(c) => app.push_char(c),
                KeyCode::Backspace => app.pop_char(),
                _ => {}
            },
        }
    }
}
