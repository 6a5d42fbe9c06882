//! Update, draft and view types exchanged with the UI layer.

use chrono::NaiveDate;

use crate::model::{ALL_TAG, ChecklistEntry, NoteItem, Priority, ProjectId};

/// Fields to update on a sticky note. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` clears the due date.
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<Priority>,
    pub checklist: Option<Vec<ChecklistEntry>>,
    pub tag: Option<String>,
    pub notes: Option<String>,
}

impl NoteUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.checklist.is_none()
            && self.tag.is_none()
            && self.notes.is_none()
    }

    /// Apply every set field to `note`.
    pub fn apply_to(&self, note: &mut NoteItem) {
        if let Some(title) = &self.title {
            note.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            note.description.clone_from(description);
        }
        if let Some(due_date) = self.due_date {
            note.due_date = due_date;
        }
        if let Some(priority) = self.priority {
            note.priority = priority;
        }
        if let Some(checklist) = &self.checklist {
            note.checklist.clone_from(checklist);
        }
        if let Some(tag) = &self.tag {
            note.tag.clone_from(tag);
        }
        if let Some(notes) = &self.notes {
            note.notes.clone_from(notes);
        }
    }
}

/// Input of the "new sticky note" form.
#[derive(Debug, Clone, Default)]
pub struct StickyNoteDraft {
    /// Used as both the project name and the note title.
    pub title: String,
    pub description: String,
    /// Comma-separated checklist text.
    pub checklist_raw: String,
    pub tag: String,
}

/// One card on the sticky wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickyCard {
    pub project_id: ProjectId,
    pub project_name: String,
    pub note: NoteItem,
    /// Resolved color of the note's tag.
    pub color: String,
}

/// One entry of the tag sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub name: String,
    pub color: String,
    pub deletable: bool,
}

/// Heading shown above the sticky wall for a tag filter.
#[must_use]
pub fn wall_title(filter: &str) -> String {
    if filter == ALL_TAG {
        "Sticky Wall".to_string()
    } else {
        format!("Sticky Wall - {filter}")
    }
}
