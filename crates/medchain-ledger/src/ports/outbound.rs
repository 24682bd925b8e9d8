//! Outbound ports (driven side - dependencies)

use chrono::{DateTime, Utc};

/// Abstract time source for block timestamps and identifiers.
pub trait TimeSource: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}
