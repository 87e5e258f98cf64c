use chrono::{SecondsFormat, Utc};
use tracing::debug;

use crate::filter::{visible_tasks, Filter};
use crate::ids::IdGenerator;
use crate::models::{Draft, Task};
use crate::stats::{compute_stats, Stats};
use crate::storage::{self, KeyValueStore};

/// Owns the task list and the session state around it.
///
/// Every mutation goes through a method here, and every change to the task
/// list or the theme flag is written back to `kv` immediately. Operations on
/// unknown ids are no-ops; the boolean results only tell callers whether
/// anything changed.
pub struct Store<K: KeyValueStore> {
    kv: K,
    tasks: Vec<Task>,
    ids: IdGenerator,
    filter: Filter,
    search: String,
    dark_mode: bool,
    editing: Option<Task>,
    show_add_form: bool,
    draft: Draft,
}

impl<K: KeyValueStore> Store<K> {
    /// Reads the task list and theme flag from `kv`, falling back to an
    /// empty list and the light theme.
    pub fn load(kv: K) -> Store<K> {
        let tasks = storage::load_tasks(&kv);
        let dark_mode = storage::load_dark_mode(&kv);
        Store {
            ids: IdGenerator::seeded_from(&tasks),
            kv,
            tasks,
            filter: Filter::default(),
            search: String::new(),
            dark_mode,
            editing: None,
            show_add_form: false,
            draft: Draft::default(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks passing the current filter and search term, in list order.
    pub fn visible(&self) -> Vec<&Task> {
        visible_tasks(&self.tasks, &self.filter, &self.search)
    }

    pub fn stats(&self) -> Stats {
        compute_stats(&self.tasks)
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    fn persist_tasks(&mut self) {
        storage::save_tasks(&mut self.kv, &self.tasks);
    }

    // Task list operations

    /// Creates a task from the draft and appends it.
    ///
    /// Does nothing when the draft title is blank. On success the draft is
    /// reset and the add form closes.
    pub fn add_task(&mut self) -> Option<u64> {
        if !self.draft.is_addable() {
            debug!("add ignored: blank title");
            return None;
        }
        let draft = std::mem::take(&mut self.draft);
        let id = self.ids.next_id(&self.tasks);
        self.tasks.push(Task {
            id,
            title: draft.title,
            description: draft.description,
            completed: false,
            priority: draft.priority,
            category: draft.category,
            due_date: draft.due_date,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        self.show_add_form = false;
        debug!(id, "task added");
        self.persist_tasks();
        Some(id)
    }

    pub fn delete_task(&mut self, id: u64) -> bool {
        let len_before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == len_before {
            debug!(id, "delete ignored: no such task");
            return false;
        }
        debug!(id, "task deleted");
        self.persist_tasks();
        true
    }

    /// Flips `completed` on every task carrying `id`.
    pub fn toggle_complete(&mut self, id: u64) -> bool {
        let mut toggled = 0;
        for t in self.tasks.iter_mut().filter(|t| t.id == id) {
            t.completed = !t.completed;
            toggled += 1;
        }
        if toggled == 0 {
            debug!(id, "toggle ignored: no such task");
            return false;
        }
        debug!(id, toggled, "task toggled");
        self.persist_tasks();
        true
    }

    // Editing

    /// Begins editing a working copy of `task`, discarding any unsaved edit.
    pub fn start_edit(&mut self, task: &Task) {
        debug!(id = task.id, "edit started");
        self.editing = Some(task.clone());
    }

    /// Starts editing the stored task with `id`, if there is one.
    pub fn start_edit_by_id(&mut self, id: u64) -> bool {
        match self.task(id).cloned() {
            Some(t) => {
                self.start_edit(&t);
                true
            }
            None => false,
        }
    }

    pub fn editing(&self) -> Option<&Task> {
        self.editing.as_ref()
    }

    pub fn set_edit_title(&mut self, title: impl Into<String>) {
        if let Some(t) = self.editing.as_mut() {
            t.title = title.into();
        }
    }

    pub fn set_edit_description(&mut self, description: impl Into<String>) {
        if let Some(t) = self.editing.as_mut() {
            t.description = description.into();
        }
    }

    /// Replaces every task matching the working copy's id and ends the edit.
    ///
    /// A working copy with a blank title is not saved and stays open.
    pub fn save_edit(&mut self) -> bool {
        let Some(edited) = self.editing.as_ref() else {
            return false;
        };
        if edited.title.trim().is_empty() {
            debug!(id = edited.id, "save ignored: blank title");
            return false;
        }
        let Some(edited) = self.editing.take() else {
            return false;
        };
        let id = edited.id;
        let mut replaced = 0;
        for slot in self.tasks.iter_mut().filter(|t| t.id == id) {
            *slot = edited.clone();
            replaced += 1;
        }
        if replaced == 0 {
            debug!(id, "save ignored: task no longer exists");
            return false;
        }
        debug!(id, replaced, "edit saved");
        self.persist_tasks();
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    // Add form

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    pub fn can_add(&self) -> bool {
        self.draft.is_addable()
    }

    pub fn show_add_form(&self) -> bool {
        self.show_add_form
    }

    pub fn open_add_form(&mut self) {
        self.show_add_form = true;
    }

    /// Closes the add form, clearing the draft title and description.
    pub fn cancel_add_form(&mut self) {
        self.show_add_form = false;
        self.draft.title.clear();
        self.draft.description.clear();
    }

    // View state

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn set_dark_mode(&mut self, dark: bool) {
        if self.dark_mode == dark {
            return;
        }
        self.dark_mode = dark;
        storage::save_dark_mode(&mut self.kv, dark);
    }

    pub fn toggle_theme(&mut self) {
        self.set_dark_mode(!self.dark_mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Priority};
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    fn store() -> Store<MemoryStore> {
        Store::load(MemoryStore::new())
    }

    fn add(store: &mut Store<MemoryStore>, title: &str) -> u64 {
        store.draft_mut().title = title.into();
        store.add_task().unwrap()
    }

    #[test]
    fn add_appends_and_resets_draft() {
        let mut s = store();
        s.open_add_form();
        {
            let d = s.draft_mut();
            d.title = "Buy milk".into();
            d.priority = Priority::Low;
            d.category = Category::Shopping;
            d.due_date = "2025-06-01".into();
        }
        let id = s.add_task().unwrap();
        assert_eq!(s.tasks().len(), 1);
        let t = s.task(id).unwrap();
        assert!(!t.completed);
        assert_eq!(t.priority, Priority::Low);
        assert_eq!(t.category, Category::Shopping);
        assert_eq!(t.due_date, "2025-06-01");
        assert!(t.created_at.ends_with('Z'));
        assert_eq!(s.draft(), &Draft::default());
        assert!(!s.show_add_form());
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut s = store();
        s.open_add_form();
        s.draft_mut().title = "   ".into();
        s.draft_mut().description = "kept".into();
        assert_eq!(s.add_task(), None);
        assert!(s.tasks().is_empty());
        assert!(s.show_add_form());
        assert_eq!(s.draft().description, "kept");
    }

    #[test]
    fn rapid_adds_get_unique_ids() {
        let mut s = store();
        let ids: Vec<u64> = (0..20).map(|i| add(&mut s, &format!("t{}", i))).collect();
        let mut dedup = ids.clone();
        dedup.dedup();
        assert_eq!(ids, dedup);
        assert_eq!(s.tasks().iter().map(|t| t.id).collect::<Vec<_>>(), ids);
    }

    #[test]
    fn delete_missing_id_is_noop() {
        let mut s = store();
        let id = add(&mut s, "a");
        let before = s.tasks().to_vec();
        assert!(!s.delete_task(id + 1000));
        assert_eq!(s.tasks(), before.as_slice());
        assert!(s.delete_task(id));
        assert!(s.task(id).is_none());
    }

    #[test]
    fn toggle_is_an_involution() {
        let mut s = store();
        let id = add(&mut s, "a");
        assert!(s.toggle_complete(id));
        assert!(s.task(id).unwrap().completed);
        assert!(s.toggle_complete(id));
        assert!(!s.task(id).unwrap().completed);
        assert!(!s.toggle_complete(id + 1));
    }

    #[test]
    fn save_edit_replaces_only_target() {
        let mut s = store();
        let a = add(&mut s, "a");
        let b = add(&mut s, "b");
        let untouched = s.task(a).unwrap().clone();

        let target = s.task(b).unwrap().clone();
        s.start_edit(&target);
        s.set_edit_title("b2");
        s.set_edit_description("more");
        assert!(s.save_edit());
        assert!(s.editing().is_none());

        let edited = s.task(b).unwrap();
        assert_eq!(edited.title, "b2");
        assert_eq!(edited.description, "more");
        assert_eq!(edited.created_at, target.created_at);
        assert_eq!(s.task(a).unwrap(), &untouched);
    }

    #[test]
    fn new_edit_discards_previous_one() {
        let mut s = store();
        let a = add(&mut s, "a");
        let b = add(&mut s, "b");
        s.start_edit_by_id(a);
        s.set_edit_title("changed");
        s.start_edit_by_id(b);
        assert!(s.save_edit());
        assert_eq!(s.task(a).unwrap().title, "a");
        assert_eq!(s.task(b).unwrap().title, "b");
    }

    #[test]
    fn save_and_cancel_without_edit() {
        let mut s = store();
        add(&mut s, "a");
        assert!(!s.save_edit());
        s.cancel_edit();
        assert!(s.editing().is_none());
    }

    #[test]
    fn blank_edit_title_keeps_edit_open() {
        let mut s = store();
        let a = add(&mut s, "a");
        s.start_edit_by_id(a);
        s.set_edit_title("  ");
        assert!(!s.save_edit());
        assert!(s.editing().is_some());
        assert_eq!(s.task(a).unwrap().title, "a");
        s.cancel_edit();
        assert!(s.editing().is_none());
    }

    #[test]
    fn cancel_add_form_keeps_selectors() {
        let mut s = store();
        s.open_add_form();
        {
            let d = s.draft_mut();
            d.title = "x".into();
            d.description = "y".into();
            d.priority = Priority::High;
            d.due_date = "2025-01-01".into();
        }
        s.cancel_add_form();
        assert!(!s.show_add_form());
        assert_eq!(s.draft().title, "");
        assert_eq!(s.draft().description, "");
        assert_eq!(s.draft().priority, Priority::High);
        assert_eq!(s.draft().due_date, "2025-01-01");
    }

    fn load_json(json: &str) -> Store<MemoryStore> {
        let mut kv = MemoryStore::new();
        kv.set(storage::TASKS_KEY, json).unwrap();
        Store::load(kv)
    }

    #[test]
    fn add_after_loading_max_id() {
        let mut s = load_json(
            r#"[{"id":18446744073709551615,"title":"Imported","createdAt":"2025-01-01T00:00:00.000Z"}]"#,
        );
        let a = add(&mut s, "first");
        let b = add(&mut s, "second");
        assert_ne!(a, u64::MAX);
        assert_ne!(a, b);
        assert_eq!(s.tasks().len(), 3);
        assert!(s.task(u64::MAX).is_some());
    }

    #[test]
    fn duplicate_ids_are_updated_together() {
        let mut s = load_json(
            r#"[{"id":5,"title":"a","createdAt":"2025-01-01T00:00:00.000Z"},
                {"id":5,"title":"b","createdAt":"2025-01-01T00:00:00.000Z"}]"#,
        );
        assert!(s.toggle_complete(5));
        let completed: Vec<bool> = s.tasks().iter().map(|t| t.completed).collect();
        assert_eq!(completed, vec![true, true]);

        s.start_edit_by_id(5);
        s.set_edit_title("merged");
        assert!(s.save_edit());
        let titles: Vec<&str> = s.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["merged", "merged"]);

        assert!(s.delete_task(5));
        assert!(s.tasks().is_empty());
    }

    #[test]
    fn changes_are_written_through() {
        let mut s = store();
        let id = add(&mut s, "persist me");
        s.toggle_complete(id);
        s.toggle_theme();

        let reloaded = Store::load(s.kv().clone());
        assert_eq!(reloaded.tasks(), s.tasks());
        assert!(reloaded.dark_mode());
    }
}
