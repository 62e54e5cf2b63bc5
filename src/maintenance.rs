//! Backup and export of the persisted collections. Both are verbatim
//! byte copies of the files on disk, never re-serializations, so the
//! produced files stay diffable against the originals.

use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::fs;
use tracing::debug;

use crate::{
    error::{ChronError, Result},
    storage::log_store::LogStore,
    utils::{clock::Clock, time::file_stamp},
};

/// Per-file outcome of an export. The two copies are attempted
/// independently: a missing statistics file must not block the data
/// copy, and vice versa.
pub struct ExportReport {
    pub data: Result<PathBuf>,
    pub stats: Result<PathBuf>,
}

/// Copies the log collection to a timestamped file in the save
/// directory.
pub async fn backup(store: &LogStore, clock: &dyn Clock) -> Result<PathBuf> {
    let stamp = file_stamp(clock.time().with_timezone(&Local));
    let dest = store.save_dir().join(format!("chron_backup-{stamp}.json"));
    copy_verbatim(&store.logs_path(), &dest).await
}

/// Copies the log collection and the statistics snapshot to timestamped
/// files at `destination`.
pub async fn export(store: &LogStore, clock: &dyn Clock, destination: &Path) -> ExportReport {
    let stamp = file_stamp(clock.time().with_timezone(&Local));

    let data = copy_verbatim(
        &store.logs_path(),
        &destination.join(format!("chron-data-{stamp}.json")),
    )
    .await;

    let stats = copy_verbatim(
        &store.stats_path(),
        &destination.join(format!("chron-stat-{stamp}.json")),
    )
    .await;

    ExportReport { data, stats }
}

async fn copy_verbatim(src: &Path, dest: &Path) -> Result<PathBuf> {
    debug!("Copying {src:?} to {dest:?}");
    fs::copy(src, dest)
        .await
        .map_err(|source| ChronError::StorageUnavailable {
            path: src.to_owned(),
            source,
        })?;
    Ok(dest.to_owned())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    use crate::{
        maintenance::{backup, export},
        stats,
        storage::{entities::LogEntry, log_store::LogStore},
        utils::clock::MockClock,
    };

    fn fixed_clock() -> MockClock {
        let mut clock = MockClock::new();
        clock
            .expect_time()
            .returning(|| Utc.timestamp_millis_opt(1_530_705_600_000).unwrap());
        clock
    }

    async fn seeded_store() -> Result<(tempfile::TempDir, tempfile::TempDir, LogStore)> {
        let (save, slot) = (tempdir()?, tempdir()?);
        let store = LogStore::new(save.path().to_owned(), slot.path().to_owned());
        store.preflight().await?;
        store
            .append_entry(LogEntry {
                start_time: 1_530_705_600_000,
                end_time: 1_530_705_660_000,
                duration_seconds: 60,
                discipline: "writing".into(),
                project: "novel".into(),
                note: "".into(),
            })
            .await?;
        Ok((save, slot, store))
    }

    #[tokio::test]
    async fn test_backup_is_byte_identical() -> Result<()> {
        let (_save, _slot, store) = seeded_store().await?;

        let path = backup(&store, &fixed_clock()).await?;

        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("chron_backup-"));
        assert!(name.ends_with(".json"));
        assert_eq!(
            tokio::fs::read(&path).await?,
            tokio::fs::read(store.logs_path()).await?
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_export_copies_both_files_verbatim() -> Result<()> {
        let (_save, _slot, store) = seeded_store().await?;
        stats::recompute(&store).await?;
        let dest = tempdir()?;

        let report = export(&store, &fixed_clock(), dest.path()).await;

        let data = report.data.expect("data copy");
        let stats_file = report.stats.expect("stats copy");
        assert_eq!(
            tokio::fs::read(&data).await?,
            tokio::fs::read(store.logs_path()).await?
        );
        assert_eq!(
            tokio::fs::read(&stats_file).await?,
            tokio::fs::read(store.stats_path()).await?
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_export_survives_missing_stats() -> Result<()> {
        let (_save, _slot, store) = seeded_store().await?;
        let dest = tempdir()?;

        // No recompute has run, so stat.json does not exist yet.
        let report = export(&store, &fixed_clock(), dest.path()).await;

        assert!(report.stats.is_err());
        let data = report.data.expect("data copy must still happen");
        assert!(data.exists());
        Ok(())
    }
}
