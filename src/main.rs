//! # Taskpro
//!
//! A personal task manager for the terminal. Tasks have a title, an optional
//! description, a priority, a category and an optional due date; they can be
//! filtered by status or attribute and searched by text.
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! Run without arguments to launch the interactive UI:
//!
//! ```bash
//! taskpro
//! # or explicitly
//! taskpro ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `q`: Quit
//! *   `a`: Add new task (`Tab` moves between fields, `Left`/`Right` change priority and category)
//! *   `e`: Edit title and description of the selected task
//! *   `Space`: Toggle the selected task complete
//! *   `d`: Delete selected task
//! *   `/`: Search
//! *   `Tab` or `1`-`8`: Choose a filter (All, Active, Completed, High, Medium, Low, Work, Personal)
//! *   `t`: Toggle light/dark theme
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! taskpro add "Buy milk" --priority low --category shopping --due 2025-12-01
//! taskpro list --filter active --search milk
//! taskpro toggle <ID>
//! taskpro edit <ID> --title "Buy oat milk"
//! taskpro remove <ID>
//! taskpro stats
//! taskpro theme dark
//! ```
//!
//! ## Data Storage
//!
//! Tasks and the theme flag are saved as `tasks.json` and `darkMode.json` in
//! your local data directory:
//! *   Linux: `~/.local/share/taskpro/`
//! *   macOS: `~/Library/Application Support/taskpro/`
//! *   Windows: `%APPDATA%\taskpro\`
//!
//! Override it with `--data-dir` or the `TASKPRO_DATA` environment variable.
//!
//! The interactive UI logs to `taskpro.log` in the same directory; the file is
//! emptied each time the UI starts.

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};

use taskpro::commands::*;
use taskpro::filter::Filter;
use taskpro::logging;
use taskpro::models::{Category, Priority};
use taskpro::storage::{data_dir, FileStore};
use taskpro::store::Store;
use taskpro::tui::run_tui;

#[derive(Parser)]
#[command(name = "taskpro")]
#[command(about = "Personal task manager", long_about = None)]
struct Cli {
    /// Directory holding tasks.json and darkMode.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// More log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Less log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    quiet: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
        /// low, medium or high
        #[arg(short, long)]
        priority: Option<Priority>,
        /// personal, work, shopping or health
        #[arg(short, long)]
        category: Option<Category>,
        /// Due date in YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
    },
    /// List tasks
    List {
        /// all, active, completed, or a priority/category name
        #[arg(short, long)]
        filter: Option<Filter>,
        /// Case-insensitive text to look for in title or description
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Toggle a task between complete and active
    Toggle {
        id: u64,
    },
    /// Remove a task
    Remove {
        id: u64,
    },
    /// Edit a task's title or description
    Edit {
        id: u64,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Show task counts
    Stats,
    /// Set the theme, or toggle it when no value is given
    Theme {
        mode: Option<ThemeMode>,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
    /// Open interactive TUI
    Ui,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeMode {
    Light,
    Dark,
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let dir = data_dir(cli.data_dir.as_deref());

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "taskpro", &mut io::stdout());
        return Ok(());
    }

    let interactive = matches!(cli.command, None | Some(Commands::Ui));
    if interactive {
        logging::init_file(&dir, cli.verbose, cli.quiet)?;
    } else {
        logging::init_stderr(cli.verbose, cli.quiet)?;
    }

    let mut store = Store::load(FileStore::open(&dir)?);

    match cli.command {
        Some(Commands::Add { title, description, priority, category, due }) => {
            cmd_add(&mut store, title, description, priority, category, due)?
        }
        Some(Commands::List { filter, search }) => cmd_list(&mut store, filter, search),
        Some(Commands::Toggle { id }) => cmd_toggle(&mut store, id),
        Some(Commands::Remove { id }) => cmd_remove(&mut store, id),
        Some(Commands::Edit { id, title, description }) => cmd_edit(&mut store, id, title, description),
        Some(Commands::Stats) => cmd_stats(&store),
        Some(Commands::Theme { mode }) => {
            cmd_theme(&mut store, mode.map(|m| matches!(m, ThemeMode::Dark)))
        }
        Some(Commands::Completions { .. }) => {}
        Some(Commands::Ui) | None => run_tui(store)?,
    }
    Ok(())
}
