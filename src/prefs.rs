//! Tiny key-value preferences file. The only setting today is the save
//! directory holding the log collection and statistics.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::{
    error::{ChronError, Result},
    fs::operations::replace_file,
};

pub const PREFS_FILENAME: &str = "prefs.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(rename = "SAVE_DIR", default, skip_serializing_if = "Option::is_none")]
    pub save_dir: Option<PathBuf>,
}

pub struct PrefsStore {
    path: PathBuf,
}

impl PrefsStore {
    pub fn new(app_dir: &Path) -> Self {
        Self {
            path: app_dir.join(PREFS_FILENAME),
        }
    }

    pub async fn load(&self) -> Result<Preferences> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| ChronError::CorruptData {
                path: self.path.clone(),
                reason: e.to_string(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Preferences::default()),
            Err(source) => Err(ChronError::StorageUnavailable {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub async fn save(&self, prefs: &Preferences) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(prefs).map_err(|e| ChronError::CorruptData {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        replace_file(&self.path, &bytes)
            .await
            .map_err(|source| ChronError::StorageUnavailable {
                path: self.path.clone(),
                source,
            })
    }

    /// Resolves the configured save directory, verifying it still exists
    /// on disk.
    pub async fn save_dir(&self) -> Result<PathBuf> {
        let dir = self.load().await?.save_dir.ok_or(ChronError::SaveDirNotSet)?;
        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(dir),
            Ok(_) => Err(ChronError::StorageUnavailable {
                path: dir,
                source: std::io::Error::new(ErrorKind::Other, "not a directory"),
            }),
            Err(source) => Err(ChronError::StorageUnavailable { path: dir, source }),
        }
    }

    /// Validates and stores a new save directory.
    pub async fn set_save_dir(&self, dir: PathBuf) -> Result<PathBuf> {
        if let Err(source) = fs::metadata(&dir).await {
            return Err(ChronError::StorageUnavailable { path: dir, source });
        }
        let mut prefs = self.load().await?;
        prefs.save_dir = Some(dir.clone());
        self.save(&prefs).await?;
        Ok(dir)
    }
}
