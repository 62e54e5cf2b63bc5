use chrono::{DateTime, Utc};

/// Represents an entity responsible for providing the current time. This
/// allows tests to pin timestamps instead of racing the wall clock.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn time(&self) -> DateTime<Utc>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
