use pretty_assertions::assert_eq;
use taskpro::commands::*;
use taskpro::filter::Filter;
use taskpro::models::{Category, Priority};
use taskpro::storage::{FileStore, KeyValueStore, MemoryStore, TASKS_KEY};
use taskpro::store::Store;
use tempfile::TempDir;

fn with_test_db<F>(f: F)
where
    F: FnOnce(&TempDir),
{
    let dir = tempfile::tempdir().expect("tempdir");
    f(&dir);
}

fn open(dir: &TempDir) -> Store<FileStore> {
    Store::load(FileStore::open(dir.path()).expect("open store"))
}

#[test]
fn test_add_and_reload() {
    with_test_db(|dir| {
        let mut store = open(dir);
        cmd_add(
            &mut store,
            "Test Task".into(),
            Some("details".into()),
            Some(Priority::High),
            Some(Category::Work),
            Some("2025-12-01".into()),
        )
        .unwrap();

        let tasks = open(dir).tasks().to_vec();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Test Task");
        assert_eq!(tasks[0].description, "details");
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[0].category, Category::Work);
        assert_eq!(tasks[0].due_date, "2025-12-01");
        assert!(!tasks[0].completed);
    });
}

#[test]
fn test_add_defaults() {
    with_test_db(|dir| {
        let mut store = open(dir);
        cmd_add(&mut store, "Plain".into(), None, None, None, None).unwrap();
        let t = &store.tasks()[0];
        assert_eq!(t.priority, Priority::Medium);
        assert_eq!(t.category, Category::Personal);
        assert_eq!(t.description, "");
        assert_eq!(t.due_date, "");
    });
}

#[test]
fn test_add_rejects_bad_input() {
    with_test_db(|dir| {
        let mut store = open(dir);
        assert!(cmd_add(&mut store, "x".into(), None, None, None, Some("12/01/2025".into())).is_err());
        cmd_add(&mut store, "   ".into(), None, None, None, None).unwrap();
        assert!(open(dir).tasks().is_empty());
    });
}

#[test]
fn test_toggle_remove_and_edit() {
    with_test_db(|dir| {
        let mut store = open(dir);
        cmd_add(&mut store, "First".into(), None, None, None, None).unwrap();
        cmd_add(&mut store, "Second".into(), None, None, None, None).unwrap();
        let first = store.tasks()[0].id;
        let second = store.tasks()[1].id;

        cmd_toggle(&mut store, first);
        assert!(open(dir).task(first).unwrap().completed);

        cmd_edit(&mut store, second, Some("Second (edited)".into()), Some("now with notes".into()));
        let reloaded = open(dir);
        let edited = reloaded.task(second).unwrap();
        assert_eq!(edited.title, "Second (edited)");
        assert_eq!(edited.description, "now with notes");

        cmd_edit(&mut store, second, Some(" ".into()), None);
        assert_eq!(open(dir).task(second).unwrap().title, "Second (edited)");
        assert!(store.editing().is_none());

        cmd_remove(&mut store, first);
        cmd_remove(&mut store, first);
        let ids: Vec<u64> = open(dir).tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second]);
    });
}

#[test]
fn test_theme_persists() {
    with_test_db(|dir| {
        let mut store = open(dir);
        assert!(!store.dark_mode());
        cmd_theme(&mut store, None);
        assert!(open(dir).dark_mode());
        cmd_theme(&mut store, Some(true));
        assert!(open(dir).dark_mode());
        cmd_theme(&mut store, Some(false));
        assert!(!open(dir).dark_mode());
    });
}

#[test]
fn test_malformed_file_starts_empty() {
    with_test_db(|dir| {
        std::fs::write(dir.path().join("tasks.json"), "not json").unwrap();
        std::fs::write(dir.path().join("darkMode.json"), "{}").unwrap();
        let mut store = open(dir);
        assert!(store.tasks().is_empty());
        assert!(!store.dark_mode());

        cmd_add(&mut store, "Recovered".into(), None, None, None, None).unwrap();
        assert_eq!(open(dir).tasks().len(), 1);
    });
}

#[test]
fn test_reads_payload_written_elsewhere() {
    let mut kv = MemoryStore::new();
    kv.set(
        TASKS_KEY,
        r#"[{"id":1714560000000,"title":"Imported","description":"","completed":true,
             "priority":"high","category":"health","dueDate":"","createdAt":"2024-05-01T10:40:00.000Z"}]"#,
    )
    .unwrap();
    let mut store = Store::load(kv);
    assert_eq!(store.tasks()[0].category, Category::Health);

    store.draft_mut().title = "New".into();
    let id = store.add_task().unwrap();
    assert!(id > 1714560000000);
}

#[test]
fn test_list_filter_is_applied() {
    with_test_db(|dir| {
        let mut store = open(dir);
        cmd_add(&mut store, "Report".into(), None, Some(Priority::High), Some(Category::Work), None).unwrap();
        cmd_add(&mut store, "Gym".into(), None, Some(Priority::Low), Some(Category::Health), None).unwrap();

        cmd_list(&mut store, Some(Filter::from_token("high")), None);
        assert_eq!(store.filter(), &Filter::Priority(Priority::High));
        let titles: Vec<&str> = store.visible().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Report"]);

        cmd_list(&mut store, Some(Filter::All), Some("GYM".into()));
        let titles: Vec<&str> = store.visible().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Gym"]);
    });
}

#[test]
fn test_empty_messages() {
    assert_eq!(empty_message(&Filter::All, ""), "No tasks yet. Create your first task!");
    assert_eq!(empty_message(&Filter::Active, ""), "No tasks found");
    assert_eq!(empty_message(&Filter::All, "x"), "No tasks found");
}

#[test]
fn test_buy_milk_scenario() {
    let mut store = Store::load(MemoryStore::new());
    {
        let d = store.draft_mut();
        d.title = "Buy milk".into();
        d.priority = Priority::Low;
        d.category = Category::Shopping;
    }
    let id = store.add_task().unwrap();
    let s = store.stats();
    assert_eq!((s.total, s.active, s.high), (1, 1, 0));

    store.toggle_complete(id);
    let s = store.stats();
    assert_eq!((s.active, s.completed), (0, 1));

    store.set_filter(Filter::from_token("shopping"));
    let visible: Vec<u64> = store.visible().iter().map(|t| t.id).collect();
    assert_eq!(visible, vec![id]);

    store.delete_task(id);
    assert_eq!(store.stats().total, 0);
}
