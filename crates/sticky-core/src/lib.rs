//! `sticky-core`: state and persistence core for the Sticky Wall organizer.
//!
//! Projects hold note items ("sticky notes") grouped by colored tags. The
//! [`ProjectStore`] is the only API the UI layer calls; it persists the whole
//! state through a [`KeyValueStore`] after every mutation.
//!
//! # Quick Start
//!
//! ```
//! use sticky_core::{MemoryStore, NoteItem, Project, ProjectStore};
//!
//! let mut store = ProjectStore::open(MemoryStore::new()).unwrap();
//! store.add_tag("Work").unwrap();
//!
//! let mut project = Project::new("Groceries");
//! project.note_items.push(NoteItem::new("Groceries").with_tag("Work"));
//! store.add_project(project).unwrap();
//!
//! assert_eq!(store.get_projects_by_tag("Work").len(), 1);
//!
//! // A later session sees the same state.
//! let store = ProjectStore::open(store.into_backend()).unwrap();
//! assert_eq!(store.get_all_projects().len(), 2);
//! ```

pub mod error;
pub mod model;
pub mod ops;
pub mod persist;
pub mod query;
pub mod store;
pub mod tags;

pub use error::{Result, StickyError};
pub use model::{ChecklistEntry, NoteId, NoteItem, Priority, Project, ProjectId, Tag};
pub use persist::{KeyValueStore, LoadedState, MemoryStore, PersistenceAdapter};
pub use query::{NoteUpdate, SidebarEntry, StickyCard, StickyNoteDraft};
pub use store::{ProjectStore, TagDeletion};
pub use tags::{ColorSource, TagAdded, TagRegistry};
