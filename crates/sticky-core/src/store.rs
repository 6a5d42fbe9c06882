//! Project store: the single entry point for the UI layer.
//!
//! Owns the project collection, the current-project pointer and the tag
//! registry. Every mutation is applied in memory and then saved through the
//! [`PersistenceAdapter`]. If the save fails the error is returned and the
//! in-memory change is kept; the next successful save writes it out.

use crate::error::{Result, StickyError};
use crate::model::{
    ALL_COLOR, ALL_TAG, DEFAULT_PROJECT_NAME, NoteId, NoteItem, PERSONAL_TAG, Project, ProjectId, Tag,
    parse_checklist,
};
use crate::ops;
use crate::persist::{KeyValueStore, MemoryStore, PersistenceAdapter};
use crate::query::{NoteUpdate, SidebarEntry, StickyCard, StickyNoteDraft};
use crate::tags::{TagAdded, TagRegistry};

/// Result of deleting a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDeletion {
    pub tag: Tag,
    /// Sticky notes moved to `Personal`.
    pub reassigned: usize,
}

/// Projects, current project and tags, persisted after every mutation.
#[derive(Debug)]
pub struct ProjectStore<S> {
    projects: Vec<Project>,
    current: Option<ProjectId>,
    tags: TagRegistry,
    persistence: PersistenceAdapter<S>,
}

impl ProjectStore<MemoryStore> {
    /// A store over an empty in-memory medium, seeded with `Home`.
    #[must_use]
    pub fn in_memory() -> Self {
        let mut store = Self {
            projects: Vec::new(),
            current: None,
            tags: TagRegistry::new(),
            persistence: PersistenceAdapter::new(MemoryStore::new()),
        };
        store.seed_default_project();
        store
    }
}

impl<S: KeyValueStore> ProjectStore<S> {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Load state from `backend`.
    ///
    /// Corrupt stored values are logged and replaced by defaults. An empty
    /// collection is seeded with a `Home` project; the seed is written on the
    /// next mutation, not here. The first loaded project becomes current.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if it cannot be read at all.
    pub fn open(backend: S) -> Result<Self> {
        let persistence = PersistenceAdapter::new(backend);

        let projects = match persistence.load_projects() {
            Ok(projects) => projects.unwrap_or_default(),
            Err(e @ StickyError::CorruptState { .. }) => {
                tracing::warn!("Discarding stored projects: {e}");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let tags = match persistence.load_tags() {
            Ok(Some(tags)) => TagRegistry::from_tags(tags),
            Ok(None) => TagRegistry::new(),
            Err(e @ StickyError::CorruptState { .. }) => {
                tracing::warn!("Discarding stored tags: {e}");
                TagRegistry::new()
            }
            Err(e) => return Err(e),
        };

        let mut store = Self {
            current: projects.first().map(|p| p.id.clone()),
            projects,
            tags,
            persistence,
        };
        if store.projects.is_empty() {
            store.seed_default_project();
        }
        tracing::debug!(
            "Opened store with {} project(s) and {} tag(s)",
            store.projects.len(),
            store.tags.tags().len()
        );
        Ok(store)
    }

    /// Write the full state now.
    ///
    /// # Errors
    ///
    /// Returns the persistence error.
    pub fn save(&mut self) -> Result<()> {
        self.persistence.save(&self.projects, self.tags.tags())
    }

    #[must_use]
    pub const fn backend(&self) -> &S {
        self.persistence.backend()
    }

    /// Give back the medium, e.g. to reopen it as a new session.
    #[must_use]
    pub fn into_backend(self) -> S {
        self.persistence.into_backend()
    }

    fn persist(&mut self) -> Result<()> {
        self.save().inspect_err(|e| {
            tracing::error!("Failed to persist state; memory and storage now differ: {e}");
        })
    }

    fn seed_default_project(&mut self) {
        let home = Project::new(DEFAULT_PROJECT_NAME);
        tracing::debug!("Seeding default project {}", home.id);
        self.current = Some(home.id.clone());
        self.projects.push(home);
    }

    // ========================================================================
    // Projects
    // ========================================================================

    /// Append a project.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the project or one of its note items has a
    /// blank ID, `IdCollision` if a project with the same ID exists, or a
    /// persistence error.
    pub fn add_project(&mut self, project: Project) -> Result<ProjectId> {
        check_project_id(&project.id)?;
        for item in &project.note_items {
            check_note_id(&item.id)?;
        }
        if self.get_project_by_id(project.id.as_str()).is_some() {
            return Err(StickyError::IdCollision {
                id: project.id.to_string(),
            });
        }
        let id = project.id.clone();
        tracing::debug!("Adding project '{}' ({})", project.name, id);
        self.projects.push(project);
        self.persist()?;
        Ok(id)
    }

    /// Remove a project and return it.
    ///
    /// If it was current, the first remaining project becomes current. If no
    /// project remains, a `Home` project is created and made current.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` (state untouched) or a persistence error.
    pub fn delete_project(&mut self, id: &str) -> Result<Project> {
        let projects = std::mem::take(&mut self.projects);
        let (remaining, removed) = ops::remove_project_from_list(projects, id);
        self.projects = remaining;
        let removed = removed.ok_or_else(|| StickyError::ProjectNotFound { id: id.to_string() })?;

        if self.current.as_ref() == Some(&removed.id) {
            self.current = self.projects.first().map(|p| p.id.clone());
        }
        if self.projects.is_empty() {
            self.seed_default_project();
        }

        tracing::debug!("Deleted project '{}' ({})", removed.name, removed.id);
        self.persist()?;
        Ok(removed)
    }

    #[must_use]
    pub fn get_project_by_id(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id.as_str() == id)
    }

    /// Point the current project at `id`.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` and leaves the pointer unchanged if no project
    /// has that ID.
    pub fn set_current_project(&mut self, id: &str) -> Result<()> {
        let project = self
            .get_project_by_id(id)
            .ok_or_else(|| StickyError::ProjectNotFound { id: id.to_string() })?;
        self.current = Some(project.id.clone());
        Ok(())
    }

    #[must_use]
    pub fn current_project(&self) -> Option<&Project> {
        self.current
            .as_ref()
            .and_then(|id| self.get_project_by_id(id.as_str()))
    }

    #[must_use]
    pub const fn current_project_id(&self) -> Option<&ProjectId> {
        self.current.as_ref()
    }

    /// The live collection, in insertion order.
    #[must_use]
    pub fn get_all_projects(&self) -> &[Project] {
        &self.projects
    }

    #[must_use]
    pub fn filter_projects(&self, predicate: impl Fn(&Project) -> bool) -> Vec<&Project> {
        self.projects.iter().filter(|p| predicate(p)).collect()
    }

    /// Projects whose sticky note carries exactly `name`; `All` returns every
    /// project.
    #[must_use]
    pub fn get_projects_by_tag(&self, name: &str) -> Vec<&Project> {
        if name == ALL_TAG {
            return self.projects.iter().collect();
        }
        self.filter_projects(|p| p.sticky_tag() == Some(name))
    }

    /// # Errors
    ///
    /// Returns `Validation` for a blank name, `ProjectNotFound`, or a
    /// persistence error.
    pub fn rename_project(&mut self, id: &str, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StickyError::validation("name", "project name cannot be empty"));
        }
        let project = self.project_mut(id)?;
        project.name = name.to_string();
        self.persist()
    }

    fn project_mut(&mut self, id: &str) -> Result<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| p.id.as_str() == id)
            .ok_or_else(|| StickyError::ProjectNotFound { id: id.to_string() })
    }

    // ========================================================================
    // Note items
    // ========================================================================

    /// Append `item` to the current project.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank item ID, `NoCurrentProject` (item
    /// dropped) or a persistence error.
    pub fn add_todo_to_current(&mut self, item: NoteItem) -> Result<()> {
        check_note_id(&item.id)?;
        let id = self.current.clone().ok_or(StickyError::NoCurrentProject)?;
        let project = self.project_mut(id.as_str())?;
        ops::add_note_item_to_project(project, item);
        self.persist()
    }

    /// Create a project holding one sticky note from the new-note form.
    ///
    /// The note gets no due date, medium priority, and a checklist parsed from
    /// the comma-separated text.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank title, or a persistence error.
    pub fn create_sticky_note(&mut self, draft: StickyNoteDraft) -> Result<ProjectId> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(StickyError::validation("title", "cannot be empty"));
        }
        let mut project = Project::new(title);
        let note = NoteItem::new(title)
            .with_description(draft.description)
            .with_checklist(parse_checklist(&draft.checklist_raw))
            .with_tag(draft.tag);
        ops::add_note_item_to_project(&mut project, note);
        self.add_project(project)
    }

    /// Apply `update` to a project's sticky note and return the result.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound`, `NoteNotFound` if the project has no note
    /// items, or a persistence error.
    pub fn update_sticky_note(&mut self, project_id: &str, update: &NoteUpdate) -> Result<&NoteItem> {
        let note = sticky_note_mut(self.project_mut(project_id)?)?;
        update.apply_to(note);
        self.persist()?;
        self.get_project_by_id(project_id)
            .and_then(Project::sticky_note)
            .ok_or_else(|| StickyError::ProjectNotFound {
                id: project_id.to_string(),
            })
    }

    /// Flip a checklist entry on a project's sticky note.
    ///
    /// Returns the new flag, or `None` for an out-of-range index (nothing is
    /// saved then).
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound`, `NoteNotFound`, or a persistence error.
    pub fn toggle_sticky_checklist(&mut self, project_id: &str, index: usize) -> Result<Option<bool>> {
        let note = sticky_note_mut(self.project_mut(project_id)?)?;
        let toggled = ops::toggle_checklist_entry(note, index);
        if toggled.is_some() {
            self.persist()?;
        }
        Ok(toggled)
    }

    /// # Errors
    ///
    /// Returns `ProjectNotFound`, `NoteNotFound`, or a persistence error.
    pub fn remove_note_item(&mut self, project_id: &str, note_id: &str) -> Result<NoteItem> {
        let project = self.project_mut(project_id)?;
        let removed = ops::remove_note_item_from_project(project, note_id).ok_or_else(|| {
            StickyError::NoteNotFound {
                id: note_id.to_string(),
            }
        })?;
        self.persist()?;
        Ok(removed)
    }

    // ========================================================================
    // Tags
    // ========================================================================

    /// # Errors
    ///
    /// Returns `Validation` or `DuplicateTag` (state untouched), or a
    /// persistence error.
    pub fn add_tag(&mut self, name: &str) -> Result<TagAdded> {
        let added = self.tags.add_tag(name)?;
        self.persist()?;
        Ok(added)
    }

    /// Delete a tag and move every sticky note that used it to `Personal`.
    ///
    /// # Errors
    ///
    /// Returns `ProtectedTag` or `TagNotFound` (state untouched), or a
    /// persistence error.
    pub fn delete_tag(&mut self, name: &str) -> Result<TagDeletion> {
        let tag = self.tags.remove_tag(name)?;
        let mut reassigned = 0;
        for note in self.projects.iter_mut().filter_map(Project::sticky_note_mut) {
            if note.tag == tag.name {
                note.tag = PERSONAL_TAG.to_string();
                reassigned += 1;
            }
        }
        tracing::debug!(
            "Deleted tag '{}', reassigned {} note(s) to {}",
            tag.name,
            reassigned,
            PERSONAL_TAG
        );
        self.persist()?;
        Ok(TagDeletion { tag, reassigned })
    }

    /// Color for a tag name, falling back to `Personal`'s color.
    #[must_use]
    pub fn get_tag_color(&self, name: &str) -> &str {
        self.tags.color(name)
    }

    #[must_use]
    pub fn get_all_tags(&self) -> &[Tag] {
        self.tags.tags()
    }

    #[must_use]
    pub const fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    /// `name` if it is a stored tag, otherwise `Personal`.
    #[must_use]
    pub fn resolve_tag<'a>(&'a self, name: &'a str) -> &'a str {
        if self.tags.contains(name) {
            name
        } else {
            PERSONAL_TAG
        }
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Cards for every project matching `filter` that has a sticky note,
    /// sorted by project name.
    #[must_use]
    pub fn sticky_wall(&self, filter: &str) -> Vec<StickyCard> {
        let mut cards: Vec<StickyCard> = self
            .get_projects_by_tag(filter)
            .into_iter()
            .filter_map(|project| {
                let note = project.sticky_note()?;
                Some(StickyCard {
                    project_id: project.id.clone(),
                    project_name: project.name.clone(),
                    note: note.clone(),
                    color: self.tags.color(&note.tag).to_string(),
                })
            })
            .collect();
        cards.sort_by(|a, b| {
            a.project_name
                .to_lowercase()
                .cmp(&b.project_name.to_lowercase())
                .then_with(|| a.project_name.cmp(&b.project_name))
        });
        cards
    }

    /// The virtual `All` entry followed by every stored tag.
    #[must_use]
    pub fn sidebar(&self) -> Vec<SidebarEntry> {
        std::iter::once(SidebarEntry {
            name: ALL_TAG.to_string(),
            color: ALL_COLOR.to_string(),
            deletable: false,
        })
        .chain(self.tags.tags().iter().map(|tag| SidebarEntry {
            name: tag.name.clone(),
            color: tag.color.clone(),
            deletable: !TagRegistry::is_protected(&tag.name),
        }))
        .collect()
    }
}

// Same rule as `Project::from_record` and `NoteItem::from_record`.
fn check_project_id(id: &ProjectId) -> Result<()> {
    if id.as_str().trim().is_empty() {
        return Err(StickyError::validation("uuid", "project id cannot be empty"));
    }
    Ok(())
}

fn check_note_id(id: &NoteId) -> Result<()> {
    if id.as_str().trim().is_empty() {
        return Err(StickyError::validation("uuid", "note id cannot be empty"));
    }
    Ok(())
}

fn sticky_note_mut(project: &mut Project) -> Result<&mut NoteItem> {
    let id = project.id.to_string();
    project
        .sticky_note_mut()
        .ok_or_else(|| StickyError::NoteNotFound {
            id: format!("sticky note of project {id}"),
        })
}
