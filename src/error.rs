use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [ChronError].
pub type Result<T> = std::result::Result<T, ChronError>;

/// Failures surfaced by the storage, tracking and maintenance layers.
/// The CLI is responsible for turning these into user-facing output.
#[derive(Debug, Error)]
pub enum ChronError {
    #[error("no save directory is set, use 'chron directory <path>' to pick one")]
    SaveDirNotSet,

    #[error("storage location {path:?} is unavailable")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("persisted data in {path:?} is corrupt: {reason}")]
    CorruptData { path: PathBuf, reason: String },

    #[error("a log is already in progress")]
    AlreadyRunning,

    #[error("no log is in progress")]
    NoActiveLog,

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}
