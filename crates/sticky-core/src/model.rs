//! Core data types for sticky-core.
//!
//! Entities are plain records. Each one also owns its persisted wire shape
//! (`*Record` types below) so the stored format does not follow internal
//! field renames.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Result, StickyError};

/// Name of the permanent default tag.
pub const PERSONAL_TAG: &str = "Personal";

/// Name of the virtual filter tag. Never stored.
pub const ALL_TAG: &str = "All";

/// Color of the `Personal` tag in a fresh registry (pastel yellow).
pub const PERSONAL_COLOR: &str = "#fff9c4";

/// Display color for the virtual `All` entry in tag listings.
pub const ALL_COLOR: &str = "#e0e0e0";

/// Name given to the project synthesized when the collection runs empty.
pub const DEFAULT_PROJECT_NAME: &str = "Home";

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(
    /// Opaque project identifier. Fresh ones are UUID v4 strings; loaded ones
    /// keep whatever was stored.
    ProjectId
);

opaque_id!(
    /// Opaque note item identifier.
    NoteId
);

// ============================================================================
// Entities
// ============================================================================

/// Note item priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = StickyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(StickyError::validation(
                "priority",
                format!("expected low|medium|high, got '{other}'"),
            )),
        }
    }
}

/// One line of a note item's checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistEntry {
    pub text: String,
    pub completed: bool,
}

impl ChecklistEntry {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }
}

/// A single note ("sticky note") inside a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: NoteId,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub checklist: Vec<ChecklistEntry>,
    /// Tag name. A weak reference: not checked against the registry on write.
    pub tag: String,
    pub notes: String,
}

impl NoteItem {
    /// Create an untagged, medium-priority note item with a fresh ID.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: NoteId::generate(),
            title: title.into(),
            description: String::new(),
            due_date: None,
            priority: Priority::default(),
            checklist: Vec::new(),
            tag: String::new(),
            notes: String::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_checklist(mut self, checklist: Vec<ChecklistEntry>) -> Self {
        self.checklist = checklist;
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// A named container of note items. Only the first item is surfaced to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub note_items: Vec<NoteItem>,
}

impl Project {
    /// Create an empty project with a fresh ID.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProjectId::generate(),
            name: name.into(),
            note_items: Vec::new(),
        }
    }

    /// The project's sticky note (its first note item).
    #[must_use]
    pub fn sticky_note(&self) -> Option<&NoteItem> {
        self.note_items.first()
    }

    pub fn sticky_note_mut(&mut self) -> Option<&mut NoteItem> {
        self.note_items.first_mut()
    }

    /// Tag of the sticky note, if there is one.
    #[must_use]
    pub fn sticky_tag(&self) -> Option<&str> {
        self.sticky_note().map(|note| note.tag.as_str())
    }
}

/// A named category with a display color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub color: String,
}

impl Tag {
    #[must_use]
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }

    /// The seeded, non-deletable default tag.
    #[must_use]
    pub fn personal() -> Self {
        Self::new(PERSONAL_TAG, PERSONAL_COLOR)
    }
}

/// Split comma-separated text into unchecked checklist entries.
///
/// Entries are trimmed; blank entries are dropped.
#[must_use]
pub fn parse_checklist(raw: &str) -> Vec<ChecklistEntry> {
    raw.split(',')
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ChecklistEntry::new)
        .collect()
}

// ============================================================================
// Wire format
// ============================================================================

/// Persisted shape of a [`Project`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub name: String,
    pub uuid: String,
    #[serde(default)]
    pub todos: Vec<NoteRecord>,
}

/// Persisted shape of a [`NoteItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// `YYYY-MM-DD` or null. Always written, never omitted.
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub checklist: Vec<ChecklistRecord>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tag: String,
    pub uuid: String,
}

/// Persisted shape of a [`ChecklistEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistRecord {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Persisted shape of a [`Tag`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    pub name: String,
    pub color: String,
}

impl Project {
    #[must_use]
    pub fn to_record(&self) -> ProjectRecord {
        ProjectRecord {
            name: self.name.clone(),
            uuid: self.id.to_string(),
            todos: self.note_items.iter().map(NoteItem::to_record).collect(),
        }
    }

    /// Rebuild a project from its persisted shape, keeping the stored IDs.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the ID is empty or any note item is malformed.
    pub fn from_record(record: ProjectRecord) -> Result<Self> {
        if record.uuid.trim().is_empty() {
            return Err(StickyError::validation("uuid", "project id cannot be empty"));
        }
        let note_items = record
            .todos
            .into_iter()
            .map(NoteItem::from_record)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            id: ProjectId::from(record.uuid),
            name: record.name,
            note_items,
        })
    }
}

impl NoteItem {
    #[must_use]
    pub fn to_record(&self) -> NoteRecord {
        NoteRecord {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self
                .due_date
                .map(|date| date.format(DUE_DATE_FORMAT).to_string()),
            priority: self.priority.as_str().to_string(),
            checklist: self
                .checklist
                .iter()
                .map(|entry| ChecklistRecord {
                    text: entry.text.clone(),
                    completed: entry.completed,
                })
                .collect(),
            notes: self.notes.clone(),
            tag: self.tag.clone(),
            uuid: self.id.to_string(),
        }
    }

    /// Rebuild a note item from its persisted shape, keeping the stored ID.
    ///
    /// An empty `dueDate` string is read as no due date.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty ID, an unparseable due date, or an
    /// unknown priority.
    pub fn from_record(record: NoteRecord) -> Result<Self> {
        if record.uuid.trim().is_empty() {
            return Err(StickyError::validation("uuid", "note id cannot be empty"));
        }
        let due_date = match record.due_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(NaiveDate::parse_from_str(raw, DUE_DATE_FORMAT).map_err(
                |e| StickyError::validation("dueDate", format!("'{raw}': {e}")),
            )?),
        };
        Ok(Self {
            id: NoteId::from(record.uuid),
            title: record.title,
            description: record.description,
            due_date,
            priority: record.priority.parse()?,
            checklist: record
                .checklist
                .into_iter()
                .map(|entry| ChecklistEntry {
                    text: entry.text,
                    completed: entry.completed,
                })
                .collect(),
            tag: record.tag,
            notes: record.notes,
        })
    }
}

impl Tag {
    #[must_use]
    pub fn to_record(&self) -> TagRecord {
        TagRecord {
            name: self.name.clone(),
            color: self.color.clone(),
        }
    }

    /// # Errors
    ///
    /// Returns `Validation` if the stored name is blank.
    pub fn from_record(record: TagRecord) -> Result<Self> {
        if record.name.trim().is_empty() {
            return Err(StickyError::validation("name", "tag name cannot be empty"));
        }
        Ok(Self::new(record.name, record.color))
    }
}
