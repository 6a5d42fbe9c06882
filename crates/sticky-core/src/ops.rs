//! List-level mutation helpers.
//!
//! Each function touches only its arguments, so they can be tested without a
//! store.

use crate::model::{NoteItem, Project};

/// Append a note item to a project.
pub fn add_note_item_to_project(project: &mut Project, item: NoteItem) {
    project.note_items.push(item);
}

/// Remove the note item with `item_id`. Returns the removed item, if any.
pub fn remove_note_item_from_project(project: &mut Project, item_id: &str) -> Option<NoteItem> {
    let idx = project
        .note_items
        .iter()
        .position(|item| item.id.as_str() == item_id)?;
    Some(project.note_items.remove(idx))
}

/// Flip the `completed` flag of the checklist entry at `index`.
///
/// Out-of-range indexes are ignored. Returns the new flag, or `None` when
/// nothing was toggled.
pub fn toggle_checklist_entry(item: &mut NoteItem, index: usize) -> Option<bool> {
    let entry = item.checklist.get_mut(index)?;
    entry.completed = !entry.completed;
    Some(entry.completed)
}

/// Return the projects without the one matching `id`, plus the removed one.
///
/// The current-project pointer is the caller's concern.
#[must_use]
pub fn remove_project_from_list(
    projects: Vec<Project>,
    id: &str,
) -> (Vec<Project>, Option<Project>) {
    let mut removed = None;
    let remaining = projects
        .into_iter()
        .filter_map(|project| {
            if removed.is_none() && project.id.as_str() == id {
                removed = Some(project);
                None
            } else {
                Some(project)
            }
        })
        .collect();
    (remaining, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChecklistEntry;

    #[test]
    fn test_add_and_remove_note_item() {
        let mut project = Project::new("Errands");
        let first = NoteItem::new("Bank");
        let second = NoteItem::new("Post office");
        let first_id = first.id.clone();
        add_note_item_to_project(&mut project, first);
        add_note_item_to_project(&mut project, second);
        assert_eq!(project.note_items.len(), 2);

        let removed = remove_note_item_from_project(&mut project, first_id.as_str()).unwrap();
        assert_eq!(removed.title, "Bank");
        assert_eq!(project.note_items.len(), 1);
        assert_eq!(project.note_items[0].title, "Post office");

        assert!(remove_note_item_from_project(&mut project, "missing").is_none());
        assert_eq!(project.note_items.len(), 1);
    }

    #[test]
    fn test_toggle_checklist_entry() {
        let mut item = NoteItem::new("Shopping")
            .with_checklist(vec![ChecklistEntry::new("Milk"), ChecklistEntry::new("Eggs")]);
        assert_eq!(toggle_checklist_entry(&mut item, 1), Some(true));
        assert!(item.checklist[1].completed);
        assert!(!item.checklist[0].completed);
        assert_eq!(toggle_checklist_entry(&mut item, 1), Some(false));
        assert!(!item.checklist[1].completed);
    }

    #[test]
    fn test_toggle_out_of_bounds_is_noop() {
        let mut item = NoteItem::new("Empty");
        let before = item.clone();
        assert_eq!(toggle_checklist_entry(&mut item, 3), None);
        assert_eq!(item, before);
    }

    #[test]
    fn test_remove_project_from_list() {
        let a = Project::new("A");
        let b = Project::new("B");
        let b_id = b.id.clone();
        let (remaining, removed) = remove_project_from_list(vec![a, b], b_id.as_str());
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "A");
        assert_eq!(removed.unwrap().name, "B");

        let (remaining, removed) = remove_project_from_list(remaining, "nope");
        assert_eq!(remaining.len(), 1);
        assert!(removed.is_none());
    }
}
