use crate::ports::outbound::TimeSource;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Default time source using system time.
#[derive(Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic time source: starts at a fixed instant and advances by a
/// fixed step on every read.
pub struct SteppingTimeSource {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingTimeSource {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }
}

impl TimeSource for SteppingTimeSource {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock();
        let current = *next;
        *next = current + self.step;
        current
    }
}
