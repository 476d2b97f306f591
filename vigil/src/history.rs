//! The rolling log of hazard onsets.

use time::OffsetDateTime;

/// How many alarm events are retained; older ones are evicted first.
pub const HISTORY_CAPACITY: usize = 5;

/// Fixed-capacity FIFO of alarm timestamps.
///
/// Storage is a flat array with an explicit head index and length; the
/// head advances modulo the capacity when a write evicts the oldest
/// entry. Writes within the same wall-clock second as the previous one
/// are suppressed, so two distinct alarm onsets inside one second
/// collapse into a single entry. That collapse is intended behavior,
/// matching the second-granularity clock the log is keyed on.
pub struct EventLog {
    entries: [Option<OffsetDateTime>; HISTORY_CAPACITY],
    head: usize,
    len: usize,
    last_logged_second: Option<i64>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog {
            entries: [None; HISTORY_CAPACITY],
            head: 0,
            len: 0,
            last_logged_second: None,
        }
    }

    /// Appends `now` to the log, evicting the oldest entry when full.
    ///
    /// Returns `true` when an entry was written, `false` when the write
    /// was suppressed because `now` falls in the same second as the
    /// previous write.
    pub fn record(&mut self, now: OffsetDateTime) -> bool {
        let second = now.unix_timestamp();
        if self.last_logged_second == Some(second) {
            return false;
        }
        self.last_logged_second = Some(second);

        let slot = (self.head + self.len) % HISTORY_CAPACITY;
        self.entries[slot] = Some(now);
        if self.len < HISTORY_CAPACITY {
            self.len += 1;
        } else {
            // Overwrote the oldest entry; the logical start moves up.
            self.head = (self.head + 1) % HISTORY_CAPACITY;
        }
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the retained timestamps oldest-first, walking logically
    /// from the head rather than by storage position.
    pub fn dump(&self) -> Vec<OffsetDateTime> {
        (0..self.len)
            .filter_map(|i| self.entries[(self.head + i) % HISTORY_CAPACITY])
            .collect()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn at(second: i64) -> OffsetDateTime {
        datetime!(2024-06-01 12:00:00 UTC) + time::Duration::seconds(second)
    }

    #[test]
    fn records_in_order_until_full() {
        let mut log = EventLog::new();
        for s in 0..3 {
            assert!(log.record(at(s)));
        }
        assert_eq!(log.dump(), vec![at(0), at(1), at(2)]);
    }

    #[test]
    fn overflow_evicts_oldest_first() {
        let mut log = EventLog::new();
        for s in 0..8 {
            log.record(at(s));
        }
        assert_eq!(log.len(), HISTORY_CAPACITY);
        assert_eq!(log.dump(), vec![at(3), at(4), at(5), at(6), at(7)]);
    }

    #[test]
    fn same_second_writes_collapse() {
        let mut log = EventLog::new();
        assert!(log.record(at(0)));
        assert!(!log.record(at(0)));
        assert_eq!(log.len(), 1);
        // The next second goes through again.
        assert!(log.record(at(1)));
    }

    #[test]
    fn dump_of_empty_log_is_empty() {
        let log = EventLog::new();
        assert!(log.is_empty());
        assert!(log.dump().is_empty());
    }

    #[test]
    fn dump_order_survives_wraparound() {
        let mut log = EventLog::new();
        for s in 0..11 {
            log.record(at(s));
        }
        let dump = log.dump();
        assert!(dump.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(dump.first(), Some(&at(6)));
        assert_eq!(dump.last(), Some(&at(10)));
    }
}
