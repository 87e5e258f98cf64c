use ratatui::widgets::TableState;

use crate::commands::validate_due;
use crate::filter::Filter;
use crate::models::Task;
use crate::storage::KeyValueStore;
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Adding,
    Editing,
}

/// Focused field of the "Add New Task" form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddField {
    Title,
    Description,
    Priority,
    Category,
    Due,
}

impl AddField {
    const ORDER: [AddField; 5] = [
        AddField::Title,
        AddField::Description,
        AddField::Priority,
        AddField::Category,
        AddField::Due,
    ];

    fn step(self, forward: bool) -> AddField {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let n = Self::ORDER.len();
        Self::ORDER[if forward { (i + 1) % n } else { (i + n - 1) % n }]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Title,
    Description,
}

pub struct App<K: KeyValueStore> {
    pub store: Store<K>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub add_field: AddField,
    pub edit_field: EditField,
    /// One-line feedback shown above the help bar.
    pub message: Option<String>,
}

impl<K: KeyValueStore> App<K> {
    pub fn new(store: Store<K>) -> App<K> {
        let mut app = App {
            store,
            state: TableState::default(),
            input_mode: InputMode::Normal,
            add_field: AddField::Title,
            edit_field: EditField::Title,
            message: None,
        };
        app.clamp_selection();
        app
    }

    pub fn visible(&self) -> Vec<&Task> {
        self.store.visible()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let i = self.state.selected()?;
        self.store.visible().get(i).copied()
    }

    fn selected_id(&self) -> Option<u64> {
        self.selected_task().map(|t| t.id)
    }

    /// Keeps the selection inside the visible list.
    pub fn clamp_selection(&mut self) {
        let len = self.store.visible().len();
        if len == 0 {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= len {
                self.state.select(Some(len - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Selects the next visible task, wrapping around.
    pub fn next(&mut self) {
        let len = self.store.visible().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous visible task, wrapping around.
    pub fn previous(&mut self) {
        let len = self.store.visible().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.toggle_complete(id);
            self.clamp_selection();
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.delete_task(id);
            self.clamp_selection();
        }
    }

    pub fn toggle_theme(&mut self) {
        self.store.toggle_theme();
    }

    /// Picks one of the filter bar presets by position.
    pub fn select_filter(&mut self, index: usize) {
        if let Some(f) = Filter::presets().into_iter().nth(index) {
            self.store.set_filter(f);
            self.state.select(None);
            self.clamp_selection();
        }
    }

    /// Moves to the next preset in the filter bar.
    pub fn cycle_filter(&mut self) {
        let presets = Filter::presets();
        let current = presets.iter().position(|f| f == self.store.filter());
        let next = current.map(|i| (i + 1) % presets.len()).unwrap_or(0);
        self.select_filter(next);
    }

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn start_add(&mut self) {
        self.store.open_add_form();
        self.add_field = AddField::Title;
        self.message = None;
        self.input_mode = InputMode::Adding;
    }

    pub fn start_edit_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.start_edit_by_id(id);
            self.edit_field = EditField::Title;
            self.message = None;
            self.input_mode = InputMode::Editing;
        }
    }

    /// Moves focus between form fields.
    pub fn next_field(&mut self, forward: bool) {
        match self.input_mode {
            InputMode::Adding => self.add_field = self.add_field.step(forward),
            InputMode::Editing => {
                self.edit_field = match self.edit_field {
                    EditField::Title => EditField::Description,
                    EditField::Description => EditField::Title,
                }
            }
            _ => {}
        }
    }

    /// Cycles the focused priority or category selector.
    pub fn cycle_selector(&mut self, forward: bool) {
        if self.input_mode != InputMode::Adding {
            return;
        }
        let draft = self.store.draft_mut();
        match self.add_field {
            AddField::Priority => draft.priority = draft.priority.cycle(forward),
            AddField::Category => draft.category = draft.category.cycle(forward),
            _ => {}
        }
    }

    /// Types a character into the focused text field.
    pub fn push_char(&mut self, c: char) {
        match self.input_mode {
            InputMode::Search => {
                let mut term = self.store.search().to_string();
                term.push(c);
                self.set_search(term);
            }
            InputMode::Adding => {
                let draft = self.store.draft_mut();
                match self.add_field {
                    AddField::Title => draft.title.push(c),
                    AddField::Description => draft.description.push(c),
                    AddField::Due => draft.due_date.push(c),
                    AddField::Priority | AddField::Category => {}
                }
            }
            InputMode::Editing => {
                if let Some(t) = self.store.editing() {
                    match self.edit_field {
                        EditField::Title => {
                            let mut title = t.title.clone();
                            title.push(c);
                            self.store.set_edit_title(title);
                        }
                        EditField::Description => {
                            let mut description = t.description.clone();
                            description.push(c);
                            self.store.set_edit_description(description);
                        }
                    }
                }
            }
            InputMode::Normal => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.input_mode {
            InputMode::Search => {
                let mut term = self.store.search().to_string();
                term.pop();
                self.set_search(term);
            }
            InputMode::Adding => {
                let draft = self.store.draft_mut();
                match self.add_field {
                    AddField::Title => {
                        draft.title.pop();
                    }
                    AddField::Description => {
                        draft.description.pop();
                    }
                    AddField::Due => {
                        draft.due_date.pop();
                    }
                    AddField::Priority | AddField::Category => {}
                }
            }
            InputMode::Editing => {
                if let Some(t) = self.store.editing() {
                    match self.edit_field {
                        EditField::Title => {
                            let mut title = t.title.clone();
                            title.pop();
                            self.store.set_edit_title(title);
                        }
                        EditField::Description => {
                            let mut description = t.description.clone();
                            description.pop();
                            self.store.set_edit_description(description);
                        }
                    }
                }
            }
            InputMode::Normal => {}
        }
    }

    fn set_search(&mut self, term: String) {
        self.store.set_search(term);
        self.state.select(None);
        self.clamp_selection();
    }

    /// Handles Enter in the current mode.
    pub fn submit(&mut self) {
        match self.input_mode {
            InputMode::Search => self.input_mode = InputMode::Normal,
            InputMode::Adding => {
                if let Err(e) = validate_due(&self.store.draft().due_date) {
                    self.message = Some(format!("{e:#}"));
                    return;
                }
                if self.store.add_task().is_some() {
                    self.message = None;
                    self.input_mode = InputMode::Normal;
                    self.clamp_selection();
                }
            }
            InputMode::Editing => {
                if self.store.save_edit() {
                    self.message = None;
                    self.input_mode = InputMode::Normal;
                    self.clamp_selection();
                } else {
                    self.message = Some("Title cannot be blank".to_string());
                }
            }
            InputMode::Normal => {}
        }
    }

    /// Handles Esc in the current mode.
    pub fn cancel(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.store.cancel_add_form(),
            InputMode::Editing => self.store.cancel_edit(),
            InputMode::Search | InputMode::Normal => {}
        }
        self.message = None;
        self.input_mode = InputMode::Normal;
    }
}
