//! File-backed storage for `sticky_wall`.
//!
//! Each key of the key-value medium is one JSON file in the data directory:
//! - Writes go to a temp file and are renamed into place
//! - The previous value is kept in `.history/` before being replaced
//!
//! # Submodules
//!
//! - [`file`] - The [`FileStore`] medium
//! - [`history`] - Backup creation, rotation and listing

pub mod file;
pub mod history;

pub use file::FileStore;
pub use history::{BackupEntry, HistoryConfig, list_backups};
