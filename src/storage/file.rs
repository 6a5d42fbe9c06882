//! Directory-backed key-value medium.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use sticky_core::{KeyValueStore, Result, StickyError};

use super::history::{self, BackupEntry, HistoryConfig};

static KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid key regex"));

const HISTORY_DIR: &str = ".history";

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    history: HistoryConfig,
}

impl FileStore {
    /// Open (creating if needed) a data directory.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the directory cannot be created or resolved.
    pub fn open(dir: impl AsRef<Path>, history: HistoryConfig) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let dir = dunce::canonicalize(dir)?;
        tracing::debug!("Opened data directory {}", dir.display());
        Ok(Self { dir, history })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn history_dir(&self) -> PathBuf {
        self.dir.join(HISTORY_DIR)
    }

    /// File holding `key`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for keys outside `[A-Za-z0-9_-]+`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        if !KEY_PATTERN.is_match(key) {
            return Err(StickyError::validation(
                "key",
                format!("'{key}' must match [A-Za-z0-9_-]+"),
            ));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    /// Backups of `key`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid key or an unreadable history directory.
    pub fn list_backups(&self, key: &str) -> Result<Vec<BackupEntry>> {
        self.path_for(key)?;
        history::list_backups(&self.history_dir(), key)
    }

    /// Put a backup's content back under `key`.
    ///
    /// The value being replaced is itself backed up first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backup cannot be read or the key written.
    pub fn restore_backup(&mut self, key: &str, entry: &BackupEntry) -> Result<()> {
        let content = fs::read_to_string(&entry.path)?;
        tracing::debug!("Restoring {} from {}", key, entry.path.display());
        self.set(key, &content)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StickyError::Io(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        history::backup_before_write(&self.history_dir(), key, &path, &self.history)?;

        let tmp_path = path.with_extension("json.tmp");
        let written = write_synced(&tmp_path, value).and_then(|()| fs::rename(&tmp_path, &path));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to remove {}: {}", tmp_path.display(), cleanup);
                }
            }
            return Err(StickyError::Io(e));
        }
        Ok(())
    }
}

fn write_synced(path: &Path, value: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()
}
