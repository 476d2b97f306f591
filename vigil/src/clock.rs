//! Wall-clock capability.
//!
//! The controller core never reads the clock itself; `main` samples it
//! once per poll and passes the value down, so tests can feed arbitrary
//! timestamps.

use std::fmt::Debug;
use time::OffsetDateTime;

pub trait WallClock: Debug {
    /// Current wall-clock time, second granularity is all the log needs.
    fn now(&self) -> OffsetDateTime;
}

/// The host system clock, in local time when the offset is known.
#[derive(Debug, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}
