//! `sticky_wall` - sticky-note project organizer
//!
//! This crate wires the [`sticky_core`] state layer to the local machine:
//! a directory-backed key-value medium, YAML configuration and `tracing`
//! output. The UI layer calls the returned [`ProjectStore`] directly.
//!
//! # Architecture
//!
//! - [`config`] - Configuration loading (YAML file + environment overrides)
//! - [`logging`] - Global `tracing` subscriber setup
//! - [`storage`] - File-backed [`KeyValueStore`] with history backups
//!
//! Entities, the tag registry and the store itself live in `sticky-core`
//! and are re-exported here.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod logging;
pub mod storage;

use anyhow::Context;
use std::path::Path;

pub use config::{Config, ConfigError};
pub use sticky_core::{
    ChecklistEntry, ColorSource, KeyValueStore, MemoryStore, NoteId, NoteItem, NoteUpdate,
    Priority, Project, ProjectId, ProjectStore, Result, SidebarEntry, StickyCard, StickyError,
    StickyNoteDraft, Tag, TagAdded, TagDeletion, TagRegistry,
};
pub use storage::FileStore;

/// Open the store in the configured data directory.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or its contents
/// cannot be read. Corrupt stored values are not errors; they are logged and
/// replaced by defaults.
pub fn open_store(config: &Config) -> anyhow::Result<ProjectStore<FileStore>> {
    let dir = config.data_dir();
    let backend = FileStore::open(&dir, config.history.clone())
        .with_context(|| format!("failed to open data directory {}", dir.display()))?;
    let store = ProjectStore::open(backend)
        .with_context(|| format!("failed to load state from {}", dir.display()))?;
    tracing::info!(
        "Loaded {} project(s) from {}",
        store.get_all_projects().len(),
        dir.display()
    );
    Ok(store)
}

/// Load configuration, start logging and open the store.
///
/// This is the one call an application makes at startup; the returned store
/// is then passed to every consumer.
///
/// # Errors
///
/// Returns an error if configuration is invalid, logging cannot be
/// installed, or the store cannot be opened.
pub fn bootstrap(config_path: Option<&Path>) -> anyhow::Result<ProjectStore<FileStore>> {
    let config = Config::load(config_path).context("failed to load configuration")?;
    logging::init_logging(&config.logging)?;
    open_store(&config)
}
