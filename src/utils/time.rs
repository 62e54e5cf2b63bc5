use chrono::{DateTime, Local, TimeZone};

/// Local wall-clock hour of an epoch-milliseconds instant, as the
/// two-digit label ("00".."23") used for the hourly buckets.
pub fn hour_label(epoch_ms: i64) -> String {
    Local
        .timestamp_millis_opt(epoch_ms)
        .single()
        .expect("Timestamp out of range")
        .format("%H")
        .to_string()
}

/// This is the standard way of stamping backup and export file names.
pub fn file_stamp(time: DateTime<Local>) -> String {
    time.format("%y%m%d_%H%M").to_string()
}
