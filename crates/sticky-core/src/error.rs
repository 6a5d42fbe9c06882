//! Error types for `sticky-core`.
//!
//! Rejections (validation, not-found, protected names) are ordinary `Err`
//! values the caller can match on; nothing in this crate panics on bad input.

use thiserror::Error;

/// Primary error type for sticky-core operations.
#[derive(Error, Debug)]
pub enum StickyError {
    // === Lookup Errors ===
    /// Project with the specified ID was not found.
    #[error("Project not found: {id}")]
    ProjectNotFound { id: String },

    /// Note item with the specified ID was not found.
    #[error("Note item not found: {id}")]
    NoteNotFound { id: String },

    /// Tag with the specified name was not found.
    #[error("Tag not found: {name}")]
    TagNotFound { name: String },

    /// An operation needed a current project but none is set.
    #[error("No current project is set")]
    NoCurrentProject,

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// A tag with the same name (compared case-insensitively) already exists.
    #[error("Tag '{name}' already exists as '{existing}'")]
    DuplicateTag { name: String, existing: String },

    /// Attempted to delete `Personal` or `All`.
    #[error("Tag '{name}' is protected and cannot be deleted")]
    ProtectedTag { name: String },

    /// Attempted to add a project whose ID already exists.
    #[error("Project ID collision: {id}")]
    IdCollision { id: String },

    // === Persistence Errors ===
    /// A persisted value could not be parsed or had the wrong shape.
    #[error("Corrupt persisted state under '{key}': {reason}")]
    CorruptState { key: String, reason: String },

    /// Generic storage backend failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StickyError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for local, recoverable rejections that left state untouched.
    ///
    /// Storage and corruption failures return `false`.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::ProjectNotFound { .. }
                | Self::NoteNotFound { .. }
                | Self::TagNotFound { .. }
                | Self::NoCurrentProject
                | Self::Validation { .. }
                | Self::DuplicateTag { .. }
                | Self::ProtectedTag { .. }
                | Self::IdCollision { .. }
        )
    }
}

/// Result type using `StickyError`.
pub type Result<T> = std::result::Result<T, StickyError>;
