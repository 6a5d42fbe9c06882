use std::fs;

use sticky_wall::config::Config;
use sticky_wall::storage::HistoryConfig;
use sticky_wall::{
    ChecklistEntry, FileStore, KeyValueStore, NoteItem, Project, ProjectStore, StickyNoteDraft,
    open_store,
};
use tempfile::TempDir;

const FIRST_PALETTE_COLOR: &str = "#f3d1b0";

fn config_for(temp: &TempDir) -> Config {
    Config {
        data_dir: Some(temp.path().join("data")),
        ..Config::default()
    }
}

#[test]
fn test_restart_keeps_projects_and_tags() {
    let temp = TempDir::new().unwrap();
    let config = config_for(&temp);

    {
        let mut store = open_store(&config).unwrap();
        assert_eq!(store.get_all_projects().len(), 1);
        assert_eq!(store.get_all_projects()[0].name, "Home");

        let added = store.add_tag("Work").unwrap();
        assert_eq!(added.tag.color, FIRST_PALETTE_COLOR);

        let mut groceries = Project::new("Groceries");
        groceries.note_items.push(
            NoteItem::new("Groceries")
                .with_tag("Work")
                .with_checklist(vec![ChecklistEntry::new("Milk")]),
        );
        store.add_project(groceries).unwrap();
        store.save().unwrap();
    }

    let store = open_store(&config).unwrap();
    let found = store.filter_projects(|p| p.name == "Groceries");
    assert_eq!(found.len(), 1);
    let note = found[0].sticky_note().unwrap();
    assert!(!note.checklist[0].completed);
    assert_eq!(note.due_date, None);
    assert_eq!(store.get_tag_color("Work"), FIRST_PALETTE_COLOR);
    assert_eq!(store.get_all_projects().len(), 2);
}

#[test]
fn test_ids_survive_restart() {
    let temp = TempDir::new().unwrap();
    let config = config_for(&temp);

    let (project_id, note_id) = {
        let mut store = open_store(&config).unwrap();
        let id = store
            .create_sticky_note(StickyNoteDraft {
                title: "Trip".to_string(),
                description: "pack light".to_string(),
                checklist_raw: "Passport, Tickets".to_string(),
                tag: "Personal".to_string(),
            })
            .unwrap();
        store.toggle_sticky_checklist(id.as_str(), 1).unwrap();
        let note_id = store
            .get_project_by_id(id.as_str())
            .and_then(Project::sticky_note)
            .map(|n| n.id.clone())
            .unwrap();
        (id, note_id)
    };

    let store = open_store(&config).unwrap();
    let project = store.get_project_by_id(project_id.as_str()).unwrap();
    let note = project.sticky_note().unwrap();
    assert_eq!(note.id, note_id);
    assert_eq!(note.description, "pack light");
    let flags: Vec<bool> = note.checklist.iter().map(|c| c.completed).collect();
    assert_eq!(flags, vec![false, true]);
}

#[test]
fn test_corrupt_file_falls_back_to_default_project() {
    let temp = TempDir::new().unwrap();
    let config = config_for(&temp);
    let data_dir = temp.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("todoProjects.json"), "{{{ not json").unwrap();

    let mut store = open_store(&config).unwrap();
    assert_eq!(store.get_all_projects().len(), 1);
    assert_eq!(store.current_project().unwrap().name, "Home");

    // The first mutation overwrites the corrupt value; the old one stays in history.
    store.add_tag("Recovered").unwrap();
    let backups = store.backend().list_backups("todoProjects").unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(
        fs::read_to_string(&backups[0].path).unwrap(),
        "{{{ not json"
    );
}

#[test]
fn test_delete_everything_leaves_home() {
    let temp = TempDir::new().unwrap();
    let config = config_for(&temp);

    {
        let mut store = open_store(&config).unwrap();
        let ids: Vec<String> = store
            .get_all_projects()
            .iter()
            .map(|p| p.id.to_string())
            .collect();
        for id in ids {
            store.delete_project(&id).unwrap();
        }
        assert_eq!(store.get_all_projects().len(), 1);
    }

    let store = open_store(&config).unwrap();
    assert_eq!(store.get_all_projects().len(), 1);
    assert_eq!(store.get_all_projects()[0].name, "Home");
    assert!(store.get_all_projects()[0].note_items.is_empty());
}

#[test]
fn test_history_can_be_disabled() {
    let temp = TempDir::new().unwrap();
    let backend = FileStore::open(
        temp.path(),
        HistoryConfig {
            enabled: false,
            ..HistoryConfig::default()
        },
    )
    .unwrap();
    let mut store = ProjectStore::open(backend).unwrap();
    store.add_tag("One").unwrap();
    store.add_tag("Two").unwrap();

    let backend = store.into_backend();
    assert!(backend.list_backups("todoTags").unwrap().is_empty());
    let raw = backend.get("todoTags").unwrap().unwrap();
    assert!(raw.contains("\"Two\""));
}

#[test]
fn test_files_use_wire_layout() {
    let temp = TempDir::new().unwrap();
    let config = config_for(&temp);
    let mut store = open_store(&config).unwrap();
    store.add_tag("Work").unwrap();

    let data_dir = temp.path().join("data");
    let projects: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("todoProjects.json")).unwrap())
            .unwrap();
    assert_eq!(projects[0]["name"], "Home");
    assert!(projects[0]["uuid"].is_string());
    assert_eq!(projects[0]["todos"], serde_json::json!([]));

    let tags: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("todoTags.json")).unwrap())
            .unwrap();
    assert_eq!(
        tags,
        serde_json::json!([
            {"name": "Personal", "color": "#fff9c4"},
            {"name": "Work", "color": FIRST_PALETTE_COLOR}
        ])
    );
}
