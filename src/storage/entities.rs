use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

/// A completed log as stored in the collection. The serde renames pin the
/// on-disk keys, which older installs and exported files already use.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    #[serde(rename = "TIME_START")]
    pub start_time: i64,
    #[serde(rename = "TIME_END")]
    pub end_time: i64,
    #[serde(rename = "TIME_LENGTH")]
    pub duration_seconds: i64,
    #[serde(rename = "DISC")]
    pub discipline: Arc<str>,
    #[serde(rename = "PROJ")]
    pub project: Arc<str>,
    #[serde(rename = "XNOTE", default)]
    pub note: Arc<str>,
}

/// A log under construction. End time and duration do not exist yet, so
/// they are not represented at all; "no log in progress" is an absent or
/// empty slot file, surfaced as `Option<ActiveLog>` by the store.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct ActiveLog {
    #[serde(rename = "TIME_START")]
    pub start_time: i64,
    #[serde(rename = "DISC")]
    pub discipline: Arc<str>,
    #[serde(rename = "PROJ")]
    pub project: Arc<str>,
    #[serde(rename = "XNOTE", default)]
    pub note: Arc<str>,
}

impl ActiveLog {
    /// Finalizes the log at `end_time` (epoch milliseconds). Duration is
    /// whole seconds, floored.
    pub fn finish(self, end_time: i64) -> LogEntry {
        LogEntry {
            start_time: self.start_time,
            end_time,
            duration_seconds: (end_time - self.start_time) / 1000,
            discipline: self.discipline,
            project: self.project,
            note: self.note,
        }
    }
}

/// Aggregate statistics derived from the full collection. Always
/// recomputed from scratch, never patched incrementally. BTreeMap keeps
/// the serialized form stable so exports stay diffable.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Default)]
pub struct StatsSnapshot {
    #[serde(rename = "discbytime")]
    pub time_by_discipline: BTreeMap<String, i64>,
    #[serde(rename = "projbytime")]
    pub time_by_project: BTreeMap<String, i64>,
    #[serde(rename = "projbydisc")]
    pub project_by_discipline: BTreeMap<String, BTreeMap<String, i64>>,
    #[serde(rename = "workbyhour")]
    pub work_by_hour: BTreeMap<String, u64>,
    #[serde(rename = "avgloglength")]
    pub avg_log_length: i64,
    #[serde(rename = "totallogs")]
    pub total_logs: u64,
    #[serde(rename = "totaltime")]
    pub total_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_floors_duration_to_seconds() {
        let active = ActiveLog {
            start_time: 1_000,
            discipline: "writing".into(),
            project: "novel".into(),
            note: "".into(),
        };

        let entry = active.finish(91_999);
        assert_eq!(entry.duration_seconds, 90);
        assert_eq!(entry.start_time, 1_000);
        assert_eq!(entry.end_time, 91_999);
    }

    #[test]
    fn entry_note_defaults_to_empty() {
        let entry: LogEntry = serde_json::from_str(
            r#"{"TIME_START":0,"TIME_END":60000,"TIME_LENGTH":60,"DISC":"a","PROJ":"x"}"#,
        )
        .unwrap();
        assert_eq!(&*entry.note, "");
    }
}
