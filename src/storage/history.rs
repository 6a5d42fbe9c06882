//! Local history backups for stored values.
//!
//! This module handles:
//! - Copying the previous value of a key into `.history/` before it is overwritten
//! - Rotating backups based on count and age
//! - Listing backups for a key

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use sticky_core::Result;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%6f";
const BACKUP_EXTENSION: &str = "json";

/// Configuration for history backups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub enabled: bool,
    pub max_count: usize,
    pub max_age_days: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_count: 50,
            max_age_days: 30,
        }
    }
}

/// Backup entry metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    pub path: PathBuf,
    pub timestamp: DateTime<Utc>,
    pub size: u64,
}

/// Copy `current` into `history_dir` as `<key>.<timestamp>.json`.
///
/// Skipped when history is disabled, when `current` does not exist, or when
/// its content equals the newest backup of the same key.
///
/// # Errors
///
/// Returns an error if the backup cannot be created or rotation fails.
pub fn backup_before_write(
    history_dir: &Path,
    key: &str,
    current: &Path,
    config: &HistoryConfig,
) -> Result<()> {
    if !config.enabled || !current.exists() {
        return Ok(());
    }

    fs::create_dir_all(history_dir)?;

    if let Some(latest) = list_backups(history_dir, key)?.into_iter().next() {
        if fs::read(current)? == fs::read(&latest.path)? {
            tracing::debug!(
                "Skipping backup: identical to latest {}",
                latest.path.display()
            );
            return Ok(());
        }
    }

    let timestamp = Utc::now().format(TIMESTAMP_FORMAT);
    let backup_path = history_dir.join(format!("{key}.{timestamp}.{BACKUP_EXTENSION}"));
    fs::copy(current, &backup_path)?;
    tracing::debug!("Created backup: {}", backup_path.display());

    rotate_history(history_dir, key, config)
}

/// Remove backups of `key` beyond `max_count` or older than `max_age_days`.
fn rotate_history(history_dir: &Path, key: &str, config: &HistoryConfig) -> Result<()> {
    let backups = list_backups(history_dir, key)?;
    let cutoff = Utc::now() - chrono::Duration::days(i64::from(config.max_age_days));

    let mut deleted_count = 0;
    for (idx, entry) in backups.iter().enumerate() {
        if idx >= config.max_count || entry.timestamp < cutoff {
            if let Err(e) = fs::remove_file(&entry.path) {
                tracing::warn!("Failed to delete backup {}: {}", entry.path.display(), e);
            } else {
                deleted_count += 1;
            }
        }
    }

    if deleted_count > 0 {
        tracing::debug!("Pruned {} old backup(s) of {}", deleted_count, key);
    }
    Ok(())
}

/// List backups of `key` sorted newest first.
///
/// Files whose names do not carry a valid timestamp are ignored.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_backups(history_dir: &Path, key: &str) -> Result<Vec<BackupEntry>> {
    if !history_dir.exists() {
        return Ok(Vec::new());
    }

    let prefix = format!("{key}.");
    let suffix = format!(".{BACKUP_EXTENSION}");
    let mut backups = Vec::new();

    for entry in fs::read_dir(history_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(ts_str) = name
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(&suffix))
        else {
            continue;
        };
        let Ok(naive) = NaiveDateTime::parse_from_str(ts_str, TIMESTAMP_FORMAT) else {
            continue;
        };
        if let Ok(metadata) = fs::metadata(&path) {
            backups.push(BackupEntry {
                timestamp: Utc.from_utc_datetime(&naive),
                size: metadata.len(),
                path,
            });
        }
    }

    backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(backups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_backup_rotation() {
        let temp = TempDir::new().unwrap();
        let history_dir = temp.path().join(".history");
        let current = temp.path().join("todoProjects.json");
        let config = HistoryConfig {
            enabled: true,
            max_count: 2,
            max_age_days: 30,
        };

        for content in ["one", "two", "three"] {
            write(&current, content);
            backup_before_write(&history_dir, "todoProjects", &current, &config).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let backups = list_backups(&history_dir, "todoProjects").unwrap();
        assert_eq!(backups.len(), 2);
        assert_eq!(fs::read_to_string(&backups[0].path).unwrap(), "three");
    }

    #[test]
    fn test_deduplication() {
        let temp = TempDir::new().unwrap();
        let history_dir = temp.path().join(".history");
        let current = temp.path().join("todoTags.json");
        write(&current, "[]");

        let config = HistoryConfig::default();
        backup_before_write(&history_dir, "todoTags", &current, &config).unwrap();
        backup_before_write(&history_dir, "todoTags", &current, &config).unwrap();

        assert_eq!(list_backups(&history_dir, "todoTags").unwrap().len(), 1);
    }

    #[test]
    fn test_disabled_or_missing_source() {
        let temp = TempDir::new().unwrap();
        let history_dir = temp.path().join(".history");
        let current = temp.path().join("todoTags.json");

        backup_before_write(&history_dir, "todoTags", &current, &HistoryConfig::default())
            .unwrap();
        assert!(!history_dir.exists());

        write(&current, "[]");
        let disabled = HistoryConfig {
            enabled: false,
            ..HistoryConfig::default()
        };
        backup_before_write(&history_dir, "todoTags", &current, &disabled).unwrap();
        assert!(!history_dir.exists());
    }

    #[test]
    fn test_list_backups_parsing() {
        let temp = TempDir::new().unwrap();
        let history_dir = temp.path();

        fs::File::create(history_dir.join("todoTags.20230101_100000_000000.json")).unwrap();
        fs::File::create(history_dir.join("todoTags.20230102_100000_000000.json")).unwrap();
        fs::File::create(history_dir.join("todoTags.invalid_name.json")).unwrap();
        fs::File::create(history_dir.join("todoProjects.20230103_100000_000000.json")).unwrap();

        let backups = list_backups(history_dir, "todoTags").unwrap();
        assert_eq!(backups.len(), 2);
        assert!(backups[0].path.to_string_lossy().contains("20230102"));
        assert!(backups[1].path.to_string_lossy().contains("20230101"));
    }
}
