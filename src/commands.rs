use anyhow::Context;
use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::filter::Filter;
use crate::models::{Category, Priority, Task};
use crate::storage::KeyValueStore;
use crate::store::Store;

/// Message shown when the visible list is empty.
pub fn empty_message(filter: &Filter, search: &str) -> &'static str {
    if !search.is_empty() || *filter != Filter::All {
        "No tasks found"
    } else {
        "No tasks yet. Create your first task!"
    }
}

/// Checks a due date is `YYYY-MM-DD`; empty means no due date.
pub fn validate_due(due: &str) -> anyhow::Result<String> {
    if due.is_empty() {
        return Ok(String::new());
    }
    NaiveDate::parse_from_str(due, "%Y-%m-%d")
        .with_context(|| format!("invalid due date '{}', use YYYY-MM-DD", due))?;
    Ok(due.to_string())
}

/// Adds a new task to the database.
pub fn cmd_add<K: KeyValueStore>(
    store: &mut Store<K>,
    title: String,
    description: Option<String>,
    priority: Option<Priority>,
    category: Option<Category>,
    due: Option<String>,
) -> anyhow::Result<()> {
    let due_date = validate_due(due.as_deref().unwrap_or(""))?;
    let draft = store.draft_mut();
    draft.title = title;
    draft.description = description.unwrap_or_default();
    draft.priority = priority.unwrap_or_default();
    draft.category = category.unwrap_or_default();
    draft.due_date = due_date;

    match store.add_task() {
        Some(id) => println!("Task added (id = {})", id),
        None => eprintln!("Task title cannot be blank."),
    }
    Ok(())
}

/// Flips the completion flag of a task.
pub fn cmd_toggle<K: KeyValueStore>(store: &mut Store<K>, id: u64) {
    if store.toggle_complete(id) {
        let done = store.task(id).map(|t| t.completed).unwrap_or(false);
        println!(
            "Task {} marked as {}.",
            id,
            if done { "complete" } else { "active" }
        );
    } else {
        eprintln!("Task {} not found.", id);
    }
}

/// Removes a task from the database by ID.
pub fn cmd_remove<K: KeyValueStore>(store: &mut Store<K>, id: u64) {
    if store.delete_task(id) {
        println!("Task {} removed.", id);
    } else {
        eprintln!("Task {} not found.", id);
    }
}

/// Edits a task's title and/or description.
pub fn cmd_edit<K: KeyValueStore>(
    store: &mut Store<K>,
    id: u64,
    title: Option<String>,
    description: Option<String>,
) {
    if !store.start_edit_by_id(id) {
        eprintln!("Task {} not found.", id);
        return;
    }
    if let Some(t) = title {
        store.set_edit_title(t);
    }
    if let Some(d) = description {
        store.set_edit_description(d);
    }
    if store.save_edit() {
        println!("Task {} updated.", id);
    } else {
        store.cancel_edit();
        eprintln!("Task title cannot be blank.");
    }
}

/// Lists the tasks passing `filter` and `search` in a formatted table.
pub fn cmd_list<K: KeyValueStore>(store: &mut Store<K>, filter: Option<Filter>, search: Option<String>) {
    if let Some(f) = filter {
        store.set_filter(f);
    }
    if let Some(s) = search {
        store.set_search(s);
    }

    let visible = store.visible();
    if visible.is_empty() {
        println!("{}", empty_message(store.filter(), store.search()));
        return;
    }

    println!("{}", task_table(&visible));
}

fn task_table(tasks: &[&Task]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Description").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let priority_color = match t.priority {
            Priority::High => Color::Red,
            Priority::Medium => Color::Yellow,
            Priority::Low => Color::Green,
        };
        let status = if t.completed { "Done" } else { "Active" };
        let status_color = if t.completed { Color::Green } else { Color::Yellow };

        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.title),
            Cell::new(&t.description),
            Cell::new(t.priority).fg(priority_color),
            Cell::new(t.category),
            Cell::new(&t.due_date),
            Cell::new(status).fg(status_color),
        ]);
    }
    table
}

/// Prints the four aggregate counts.
pub fn cmd_stats<K: KeyValueStore>(store: &Store<K>) {
    let s = store.stats();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Total Tasks", "Completed", "Active", "High Priority"]);
    table.add_row(vec![
        s.total.to_string(),
        s.completed.to_string(),
        s.active.to_string(),
        s.high.to_string(),
    ]);
    println!("{table}");
}

/// Sets the theme, or toggles it when `dark` is `None`.
pub fn cmd_theme<K: KeyValueStore>(store: &mut Store<K>, dark: Option<bool>) {
    match dark {
        Some(d) => store.set_dark_mode(d),
        None => store.toggle_theme(),
    }
    println!("Theme: {}", if store.dark_mode() { "dark" } else { "light" });
}
