//! Persistence of projects and tags to a string key-value medium.
//!
//! Layout: two JSON arrays stored under fixed keys.
//! - `todoProjects`: projects with their nested note items.
//! - `todoTags`: `{name, color}` pairs.
//!
//! Each save fully overwrites both values. The two writes are not atomic as a
//! pair.

use std::collections::HashMap;

use crate::error::{Result, StickyError};
use crate::model::{Project, ProjectRecord, Tag, TagRecord};

/// Key holding the serialized project collection.
pub const PROJECTS_KEY: &str = "todoProjects";

/// Key holding the serialized tag collection.
pub const TAGS_KEY: &str = "todoTags";

/// A durable medium mapping string keys to string values.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory key-value medium.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Everything `load` recovered from the medium.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadedState {
    /// Stored projects; empty when the key is absent.
    pub projects: Vec<Project>,
    /// Stored tags, or `None` when the key is absent and defaults apply.
    pub tags: Option<Vec<Tag>>,
}

/// Translates the entity graph to and from a [`KeyValueStore`].
#[derive(Debug)]
pub struct PersistenceAdapter<S> {
    backend: S,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
    #[must_use]
    pub const fn new(backend: S) -> Self {
        Self { backend }
    }

    #[must_use]
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    #[must_use]
    pub fn into_backend(self) -> S {
        self.backend
    }

    /// Serialize and write both collections.
    ///
    /// # Errors
    ///
    /// Returns `Json` if serialization fails, or the backend's error if a
    /// write fails. A failed tag write leaves the new project value in place.
    pub fn save(&mut self, projects: &[Project], tags: &[Tag]) -> Result<()> {
        let project_records: Vec<ProjectRecord> = projects.iter().map(Project::to_record).collect();
        let tag_records: Vec<TagRecord> = tags.iter().map(Tag::to_record).collect();

        let projects_json = serde_json::to_string(&project_records)?;
        let tags_json = serde_json::to_string(&tag_records)?;

        self.backend.set(PROJECTS_KEY, &projects_json)?;
        self.backend.set(TAGS_KEY, &tags_json)?;

        tracing::debug!(
            "Saved {} project(s) and {} tag(s)",
            projects.len(),
            tags.len()
        );
        Ok(())
    }

    /// Read the stored projects. `Ok(None)` means the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `CorruptState` if the value is not a valid project list, or the
    /// backend's error if it cannot be read.
    pub fn load_projects(&self) -> Result<Option<Vec<Project>>> {
        let Some(raw) = self.backend.get(PROJECTS_KEY)? else {
            return Ok(None);
        };
        let records: Vec<ProjectRecord> =
            serde_json::from_str(&raw).map_err(|e| corrupt(PROJECTS_KEY, &e))?;
        records
            .into_iter()
            .map(Project::from_record)
            .collect::<Result<Vec<_>>>()
            .map(Some)
            .map_err(|e| corrupt(PROJECTS_KEY, &e))
    }

    /// Read the stored tags. `Ok(None)` means the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `CorruptState` if the value is not a valid tag list, or the
    /// backend's error if it cannot be read.
    pub fn load_tags(&self) -> Result<Option<Vec<Tag>>> {
        let Some(raw) = self.backend.get(TAGS_KEY)? else {
            return Ok(None);
        };
        let records: Vec<TagRecord> =
            serde_json::from_str(&raw).map_err(|e| corrupt(TAGS_KEY, &e))?;
        records
            .into_iter()
            .map(Tag::from_record)
            .collect::<Result<Vec<_>>>()
            .map(Some)
            .map_err(|e| corrupt(TAGS_KEY, &e))
    }

    /// Read both keys.
    ///
    /// # Errors
    ///
    /// Returns the first `CorruptState` or backend error encountered.
    pub fn load(&self) -> Result<LoadedState> {
        Ok(LoadedState {
            projects: self.load_projects()?.unwrap_or_default(),
            tags: self.load_tags()?,
        })
    }
}

fn corrupt(key: &str, reason: &dyn std::fmt::Display) -> StickyError {
    StickyError::CorruptState {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
