use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tokio::fs;
use tracing::debug;

use crate::{
    error::{ChronError, Result},
    fs::operations::replace_file,
};

use super::entities::{ActiveLog, LogEntry, StatsSnapshot};

pub const LOGS_FILENAME: &str = "logs.json";
pub const STATS_FILENAME: &str = "stat.json";
pub const ACTIVE_FILENAME: &str = "temp.json";

/// Owns every read and write of the persisted files. The log collection
/// and statistics live in the user-chosen save directory; the active-log
/// slot lives in the application state directory so it survives between
/// invocations regardless of where the data is kept.
///
/// A missing file, a corrupt file and an unreadable file are three
/// different answers here. Nothing is collapsed into a default value, so
/// data loss can't masquerade as an empty collection.
pub struct LogStore {
    save_dir: PathBuf,
    slot_dir: PathBuf,
}

impl LogStore {
    pub fn new(save_dir: PathBuf, slot_dir: PathBuf) -> Self {
        Self { save_dir, slot_dir }
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    pub fn logs_path(&self) -> PathBuf {
        self.save_dir.join(LOGS_FILENAME)
    }

    pub fn stats_path(&self) -> PathBuf {
        self.save_dir.join(STATS_FILENAME)
    }

    pub fn active_path(&self) -> PathBuf {
        self.slot_dir.join(ACTIVE_FILENAME)
    }

    /// Checks the mission-critical files and seeds the ones a fresh
    /// install is missing. The collection starts as an empty array; the
    /// statistics file appears with the first recompute and an absent
    /// slot already means "no log in progress".
    pub async fn preflight(&self) -> Result<()> {
        if let Err(source) = fs::metadata(&self.save_dir).await {
            return Err(ChronError::StorageUnavailable {
                path: self.save_dir.clone(),
                source,
            });
        }

        let logs = self.logs_path();
        match fs::metadata(&logs).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Seeding empty collection at {logs:?}");
                replace_file(&logs, b"[]")
                    .await
                    .map_err(|source| ChronError::StorageUnavailable { path: logs, source })
            }
            Err(source) => Err(ChronError::StorageUnavailable { path: logs, source }),
        }
    }

    pub async fn load_collection(&self) -> Result<Vec<LogEntry>> {
        let path = self.logs_path();
        let bytes = fs::read(&path)
            .await
            .map_err(|source| ChronError::StorageUnavailable {
                path: path.clone(),
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|e| ChronError::CorruptData {
            path,
            reason: e.to_string(),
        })
    }

    /// Appends one finalized entry to the collection. The whole array is
    /// re-serialized and swapped in through a rename, so the file is
    /// always either in its pre-append state or fully appended. A crash
    /// between write and rename leaves a stale sibling, never a broken
    /// collection.
    pub async fn append_entry(&self, entry: LogEntry) -> Result<()> {
        let mut collection = self.load_collection().await?;
        collection.push(entry);
        let path = self.logs_path();
        let bytes = serialize_pretty(&collection, &path)?;
        replace_file(&path, &bytes)
            .await
            .map_err(|source| ChronError::StorageUnavailable { path, source })
    }

    /// Reads the active-log slot. An absent or empty slot is the valid
    /// idle state; anything present but unparsable is reported as
    /// corrupt rather than treated as idle.
    pub async fn load_active(&self) -> Result<Option<ActiveLog>> {
        let path = self.active_path();
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ChronError::StorageUnavailable { path, source }),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| ChronError::CorruptData {
                path,
                reason: e.to_string(),
            })
    }

    pub async fn save_active(&self, log: &ActiveLog) -> Result<()> {
        let path = self.active_path();
        let bytes = serialize_pretty(log, &path)?;
        replace_file(&path, &bytes)
            .await
            .map_err(|source| ChronError::StorageUnavailable { path, source })
    }

    /// Resets the slot to the idle representation (an empty file).
    pub async fn clear_active(&self) -> Result<()> {
        let path = self.active_path();
        replace_file(&path, b"")
            .await
            .map_err(|source| ChronError::StorageUnavailable { path, source })
    }

    /// Loads the last persisted snapshot. The file holds a one-element
    /// array; `None` means no snapshot has been computed yet.
    pub async fn load_stats(&self) -> Result<Option<StatsSnapshot>> {
        let path = self.stats_path();
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ChronError::StorageUnavailable { path, source }),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let snapshots: Vec<StatsSnapshot> =
            serde_json::from_slice(&bytes).map_err(|e| ChronError::CorruptData {
                path,
                reason: e.to_string(),
            })?;
        Ok(snapshots.into_iter().next())
    }

    pub async fn save_stats(&self, stats: &StatsSnapshot) -> Result<()> {
        let path = self.stats_path();
        let bytes = serialize_pretty(std::slice::from_ref(stats), &path)?;
        replace_file(&path, &bytes)
            .await
            .map_err(|source| ChronError::StorageUnavailable { path, source })
    }
}

fn serialize_pretty<T: serde::Serialize + ?Sized>(value: &T, path: &Path) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(value).map_err(|e| ChronError::CorruptData {
        path: path.to_owned(),
        reason: e.to_string(),
    })
}
