//! Lifecycle of the single in-progress log. The Idle/Running state is
//! carried entirely by the persisted slot, so it survives between
//! invocations without any in-process state.

use tracing::{debug, warn};

use crate::{
    error::{ChronError, Result},
    stats,
    storage::{
        entities::{ActiveLog, LogEntry, StatsSnapshot},
        log_store::LogStore,
    },
    utils::clock::Clock,
};

/// Outcome of a successful `stop`. The entry is durably appended; the
/// snapshot refresh may still have failed, in which case its error is
/// carried here instead of rolling anything back (statistics are a
/// regenerable cache, the collection is the source of truth).
#[derive(Debug)]
pub struct StopReport {
    pub entry: LogEntry,
    pub stats: Result<StatsSnapshot>,
}

pub struct ActiveLogManager {
    store: LogStore,
    clock: Box<dyn Clock>,
}

impl ActiveLogManager {
    pub fn new(store: LogStore, clock: Box<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &LogStore {
        &self.store
    }

    /// Starts a new log. Fails with [ChronError::AlreadyRunning] when the
    /// slot already holds one; the existing log is left untouched.
    pub async fn start(
        &self,
        discipline: &str,
        project: &str,
        note: Option<&str>,
    ) -> Result<ActiveLog> {
        if discipline.trim().is_empty() || project.trim().is_empty() {
            return Err(ChronError::InvalidArguments(
                "discipline and project must be non-empty".into(),
            ));
        }
        if self.store.load_active().await?.is_some() {
            return Err(ChronError::AlreadyRunning);
        }

        let log = ActiveLog {
            start_time: self.clock.time().timestamp_millis(),
            discipline: discipline.into(),
            project: project.into(),
            note: note.unwrap_or_default().into(),
        };
        self.store.save_active(&log).await?;
        debug!(
            "Started log for discipline {:?} project {:?}",
            log.discipline, log.project
        );
        Ok(log)
    }

    /// Discards any in-progress log and returns it. Valid from any state:
    /// cancelling while idle is a no-op, and a corrupt slot is discarded
    /// too since cancel is the escape hatch for exactly that situation.
    pub async fn cancel(&self) -> Result<Option<ActiveLog>> {
        let active = match self.store.load_active().await {
            Ok(active) => active,
            Err(ChronError::CorruptData { path, reason }) => {
                warn!("Discarding corrupt active log at {path:?}: {reason}");
                None
            }
            Err(e) => return Err(e),
        };
        self.store.clear_active().await?;
        Ok(active)
    }

    /// Reports the in-progress log, if any. Never mutates state.
    pub async fn status(&self) -> Result<Option<ActiveLog>> {
        self.store.load_active().await
    }

    /// Finalizes the running log, appends it to the collection and
    /// refreshes the statistics. The slot is cleared only after the
    /// append succeeds; on a failed append the running log stays in the
    /// slot so the tracked time is still recoverable.
    pub async fn stop(&self) -> Result<StopReport> {
        let Some(active) = self.store.load_active().await? else {
            return Err(ChronError::NoActiveLog);
        };

        let entry = active.finish(self.clock.time().timestamp_millis());
        self.store.append_entry(entry.clone()).await?;
        self.store.clear_active().await?;

        let stats = stats::recompute(&self.store).await;
        if let Err(e) = &stats {
            warn!("Statistics recompute failed after append: {e}");
        }

        Ok(StopReport { entry, stats })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    };

    use anyhow::Result;
    use chrono::{TimeZone, Utc};
    use tempfile::{tempdir, TempDir};

    use crate::{
        error::ChronError,
        storage::log_store::LogStore,
        tracker::ActiveLogManager,
        utils::clock::MockClock,
    };

    const T0: i64 = 1_530_705_600_000;

    /// Manager over temp directories with a clock driven by `now_ms`.
    async fn test_manager(
        save: &TempDir,
        slot: &TempDir,
        now_ms: Arc<AtomicI64>,
    ) -> Result<ActiveLogManager> {
        let store = LogStore::new(save.path().to_owned(), slot.path().to_owned());
        store.preflight().await?;

        let mut clock = MockClock::new();
        clock.expect_time().returning(move || {
            Utc.timestamp_millis_opt(now_ms.load(Ordering::SeqCst))
                .unwrap()
        });
        Ok(ActiveLogManager::new(store, Box::new(clock)))
    }

    #[tokio::test]
    async fn test_start_then_stop_records_single_entry() -> Result<()> {
        let (save, slot) = (tempdir()?, tempdir()?);
        let now_ms = Arc::new(AtomicI64::new(T0));
        let manager = test_manager(&save, &slot, now_ms.clone()).await?;

        manager.start("writing", "novel", Some("draft two")).await?;
        now_ms.store(T0 + 90_500, Ordering::SeqCst);
        let report = manager.stop().await?;

        assert_eq!(report.entry.duration_seconds, 90);
        assert_eq!(report.entry.start_time, T0);
        assert_eq!(report.entry.end_time, T0 + 90_500);
        assert_eq!(&*report.entry.note, "draft two");

        let collection = manager.store().load_collection().await?;
        assert_eq!(collection, vec![report.entry]);
        assert_eq!(manager.status().await?, None);

        let snapshot = report.stats.expect("stats should recompute");
        assert_eq!(snapshot.total_logs, 1);
        assert_eq!(snapshot.total_time, 90);
        assert_eq!(manager.store().load_stats().await?, Some(snapshot));
        Ok(())
    }

    #[tokio::test]
    async fn test_start_while_running_fails_and_preserves_log() -> Result<()> {
        let (save, slot) = (tempdir()?, tempdir()?);
        let now_ms = Arc::new(AtomicI64::new(T0));
        let manager = test_manager(&save, &slot, now_ms.clone()).await?;

        let first = manager.start("writing", "novel", None).await?;
        now_ms.store(T0 + 5_000, Ordering::SeqCst);
        let err = manager.start("code", "compiler", None).await.unwrap_err();

        assert!(matches!(err, ChronError::AlreadyRunning));
        assert_eq!(manager.status().await?, Some(first));
        Ok(())
    }

    #[tokio::test]
    async fn test_stop_while_idle_fails_and_leaves_collection() -> Result<()> {
        let (save, slot) = (tempdir()?, tempdir()?);
        let manager = test_manager(&save, &slot, Arc::new(AtomicI64::new(T0))).await?;

        let err = manager.stop().await.unwrap_err();

        assert!(matches!(err, ChronError::NoActiveLog));
        assert_eq!(manager.store().load_collection().await?, vec![]);
        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_while_idle_is_noop() -> Result<()> {
        let (save, slot) = (tempdir()?, tempdir()?);
        let manager = test_manager(&save, &slot, Arc::new(AtomicI64::new(T0))).await?;

        assert_eq!(manager.cancel().await?, None);
        assert_eq!(manager.status().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_discards_without_recording() -> Result<()> {
        let (save, slot) = (tempdir()?, tempdir()?);
        let manager = test_manager(&save, &slot, Arc::new(AtomicI64::new(T0))).await?;

        let started = manager.start("writing", "novel", None).await?;
        let discarded = manager.cancel().await?;

        assert_eq!(discarded, Some(started));
        assert_eq!(manager.status().await?, None);
        assert_eq!(manager.store().load_collection().await?, vec![]);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_append_keeps_active_log() -> Result<()> {
        let (save, slot) = (tempdir()?, tempdir()?);
        let now_ms = Arc::new(AtomicI64::new(T0));
        let manager = test_manager(&save, &slot, now_ms.clone()).await?;

        let started = manager.start("writing", "novel", None).await?;

        // Turn the collection into a directory so the append cannot
        // succeed.
        let logs_path = manager.store().logs_path();
        tokio::fs::remove_file(&logs_path).await?;
        tokio::fs::create_dir(&logs_path).await?;

        now_ms.store(T0 + 60_000, Ordering::SeqCst);
        assert!(manager.stop().await.is_err());

        // The running log must still be recoverable.
        assert_eq!(manager.status().await?, Some(started));
        Ok(())
    }

    #[tokio::test]
    async fn test_start_rejects_blank_discipline() -> Result<()> {
        let (save, slot) = (tempdir()?, tempdir()?);
        let manager = test_manager(&save, &slot, Arc::new(AtomicI64::new(T0))).await?;

        let err = manager.start("  ", "novel", None).await.unwrap_err();

        assert!(matches!(err, ChronError::InvalidArguments(_)));
        assert_eq!(manager.status().await?, None);
        Ok(())
    }
}
