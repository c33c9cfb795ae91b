//! Time source for server-assigned timestamps.
//!
//! Handlers never call `Utc::now()` directly; they go through a [`Clock`]
//! held in application state so tests can control time.

use crate::types::Timestamp;

/// Source of the current time in epoch seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        chrono::Utc::now().timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_2024() {
        // 2024-01-01T00:00:00Z
        assert!(SystemClock.now() > 1_704_067_200);
    }
}
