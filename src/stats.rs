//! Statistics derivation. The snapshot is always rebuilt from the full
//! collection; nothing is patched incrementally, so a stale or corrupt
//! snapshot can always be regenerated and never drifts.

use std::collections::BTreeMap;

use crate::{
    error::Result,
    storage::{
        entities::{LogEntry, StatsSnapshot},
        log_store::LogStore,
    },
    utils::time::hour_label,
};

/// Derives a snapshot from the collection in one pass. Deterministic for
/// a given input regardless of call order or any prior snapshot.
pub fn compute(entries: &[LogEntry]) -> StatsSnapshot {
    let mut stats = StatsSnapshot {
        total_logs: entries.len() as u64,
        ..Default::default()
    };

    for entry in entries {
        let seconds = entry.duration_seconds;
        stats.total_time += seconds;

        *stats
            .time_by_discipline
            .entry(entry.discipline.to_string())
            .or_default() += seconds;

        *stats
            .time_by_project
            .entry(entry.project.to_string())
            .or_default() += seconds;

        *stats
            .project_by_discipline
            .entry(entry.project.to_string())
            .or_default()
            .entry(entry.discipline.to_string())
            .or_default() += seconds;

        bucket_hours(&mut stats.work_by_hour, entry);
    }

    if stats.total_logs > 0 {
        stats.avg_log_length = stats.total_time / stats.total_logs as i64;
    }

    stats
}

/// Loads the collection, derives a fresh snapshot and persists it.
pub async fn recompute(store: &LogStore) -> Result<StatsSnapshot> {
    let entries = store.load_collection().await?;
    let stats = compute(&entries);
    store.save_stats(&stats).await?;
    Ok(stats)
}

/// A log an hour or shorter counts once, under the local hour it started
/// in. A longer log counts every hour boundary it touches: one increment
/// per `h in 0..=duration/3600`, at the local hour of `start + h` hours.
/// The buckets are a coverage count (hours touched), not time spent per
/// hour, and the same hour-of-day may be counted again across days.
fn bucket_hours(buckets: &mut BTreeMap<String, u64>, entry: &LogEntry) {
    if entry.duration_seconds <= 3600 {
        *buckets.entry(hour_label(entry.start_time)).or_default() += 1;
    } else {
        for h in 0..=(entry.duration_seconds / 3600) {
            let touched = hour_label(entry.start_time + h * 3_600_000);
            *buckets.entry(touched).or_default() += 1;
        }
    }
}
