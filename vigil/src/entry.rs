//! The deactivation-code entry state machine.
//!
//! Keys are accepted edge-triggered: a newly scanned key is armed behind a
//! debounce timer and only accepted once it has stayed stable for the
//! debounce interval, checked once per poll. Nothing here sleeps, so
//! sensor sampling keeps its cadence while a key settles.
//!
//! Note that the entered code is never compared against any stored
//! secret. The buffer fills up to four characters and only ever resets:
//! '#' on an empty buffer requests a history dump, '#' otherwise just
//! discards the input. Whether deactivation was meant to hang off this
//! buffer is an open question inherited from the observed device
//! behavior; do not "complete" it here.

use std::time::{Duration, Instant};

/// Maximum number of characters the code buffer holds.
pub const CODE_CAPACITY: usize = 4;

/// What an accepted key amounted to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EntryEvent {
    /// A key was appended to the code buffer; echo one ack character.
    Digit(char),
    /// '#' with an empty buffer: the caller should dump the alarm history.
    Dump,
    /// '#' with buffered digits: the input was discarded, nothing else.
    Discarded,
}

/// Bounded input buffer plus the per-key debounce bookkeeping.
#[derive(Debug)]
pub struct CodeEntry {
    buffer: Vec<char>,
    debounce: Duration,
    /// Last key accepted and still (presumed) held; suppresses repeats
    /// until the keypad scans as idle again.
    last_accepted: Option<char>,
    /// Key waiting out the debounce interval, with the time it was armed.
    pending: Option<(char, Instant)>,
}

impl CodeEntry {
    pub fn new(debounce: Duration) -> Self {
        CodeEntry {
            buffer: Vec::with_capacity(CODE_CAPACITY),
            debounce,
            last_accepted: None,
            pending: None,
        }
    }

    /// The characters entered so far, in entry order.
    pub fn buffer(&self) -> &[char] {
        &self.buffer
    }

    /// Feeds one keypad scan result at time `at`.
    ///
    /// Returns the event produced by an accepted key, or `None` while
    /// idle, while a key is still settling, or while an accepted key
    /// remains held.
    pub fn poll(&mut self, scanned: Option<char>, at: Instant) -> Option<EntryEvent> {
        let Some(key) = scanned else {
            // Keypad idle: the next press is a fresh edge.
            self.last_accepted = None;
            self.pending = None;
            return None;
        };

        if self.last_accepted == Some(key) {
            // Still held since acceptance.
            self.pending = None;
            return None;
        }

        match self.pending {
            Some((pending_key, armed)) if pending_key == key => {
                if at.duration_since(armed) < self.debounce {
                    return None;
                }
                self.pending = None;
                self.last_accepted = Some(key);
                self.accept(key)
            }
            _ => {
                // New edge (or the pending key changed): restart the timer.
                self.pending = Some((key, at));
                None
            }
        }
    }

    fn accept(&mut self, key: char) -> Option<EntryEvent> {
        if key == '#' {
            let was_empty = self.buffer.is_empty();
            self.buffer.clear();
            if was_empty {
                Some(EntryEvent::Dump)
            } else {
                Some(EntryEvent::Discarded)
            }
        } else if self.buffer.len() < CODE_CAPACITY {
            self.buffer.push(key);
            Some(EntryEvent::Digit(key))
        } else {
            // A full buffer swallows further keys until '#' resets it;
            // the key still counts as accepted for debounce purposes,
            // but no ack is echoed.
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE: Duration = Duration::from_millis(200);

    /// Presses and releases a key cleanly: arm, settle, accept, release.
    fn press(entry: &mut CodeEntry, key: char, t: &mut Instant) -> Option<EntryEvent> {
        assert_eq!(entry.poll(Some(key), *t), None, "arming should not accept");
        *t += DEBOUNCE;
        let event = entry.poll(Some(key), *t);
        *t += Duration::from_millis(10);
        entry.poll(None, *t);
        event
    }

    #[test]
    fn digits_accumulate_in_entry_order() {
        let mut entry = CodeEntry::new(DEBOUNCE);
        let mut t = Instant::now();
        for key in ['1', '9', '*', 'A'] {
            assert_eq!(press(&mut entry, key, &mut t), Some(EntryEvent::Digit(key)));
        }
        assert_eq!(entry.buffer(), &['1', '9', '*', 'A']);
    }

    #[test]
    fn fifth_key_is_swallowed_by_a_full_buffer() {
        let mut entry = CodeEntry::new(DEBOUNCE);
        let mut t = Instant::now();
        for key in ['1', '2', '3', '4'] {
            press(&mut entry, key, &mut t);
        }
        // No event, no ack, no growth.
        assert_eq!(press(&mut entry, '5', &mut t), None);
        assert_eq!(entry.buffer(), &['1', '2', '3', '4']);
    }

    #[test]
    fn hash_always_clears_the_buffer() {
        let mut entry = CodeEntry::new(DEBOUNCE);
        let mut t = Instant::now();
        press(&mut entry, '7', &mut t);
        press(&mut entry, '7', &mut t);
        assert_eq!(press(&mut entry, '#', &mut t), Some(EntryEvent::Discarded));
        assert!(entry.buffer().is_empty());
    }

    #[test]
    fn hash_on_empty_buffer_requests_exactly_one_dump() {
        let mut entry = CodeEntry::new(DEBOUNCE);
        let mut t = Instant::now();
        assert_eq!(press(&mut entry, '#', &mut t), Some(EntryEvent::Dump));
        // With digits buffered, '#' discards instead.
        press(&mut entry, '3', &mut t);
        assert_eq!(press(&mut entry, '#', &mut t), Some(EntryEvent::Discarded));
    }

    #[test]
    fn held_key_is_accepted_once() {
        let mut entry = CodeEntry::new(DEBOUNCE);
        let t0 = Instant::now();
        assert_eq!(entry.poll(Some('5'), t0), None);
        assert_eq!(entry.poll(Some('5'), t0 + DEBOUNCE), Some(EntryEvent::Digit('5')));
        // Held for many more polls: nothing further.
        for i in 1..50u64 {
            assert_eq!(
                entry.poll(Some('5'), t0 + DEBOUNCE + Duration::from_millis(10 * i)),
                None
            );
        }
        assert_eq!(entry.buffer(), &['5']);
    }

    #[test]
    fn release_makes_the_same_key_a_new_edge() {
        let mut entry = CodeEntry::new(DEBOUNCE);
        let mut t = Instant::now();
        press(&mut entry, '5', &mut t);
        press(&mut entry, '5', &mut t);
        assert_eq!(entry.buffer(), &['5', '5']);
    }

    #[test]
    fn sub_debounce_blip_is_ignored() {
        let mut entry = CodeEntry::new(DEBOUNCE);
        let t0 = Instant::now();
        assert_eq!(entry.poll(Some('5'), t0), None);
        assert_eq!(entry.poll(Some('5'), t0 + Duration::from_millis(50)), None);
        // Released before the interval elapsed.
        assert_eq!(entry.poll(None, t0 + Duration::from_millis(60)), None);
        assert!(entry.buffer().is_empty());
    }

    #[test]
    fn bouncing_to_a_different_key_restarts_the_timer() {
        let mut entry = CodeEntry::new(DEBOUNCE);
        let t0 = Instant::now();
        assert_eq!(entry.poll(Some('5'), t0), None);
        assert_eq!(entry.poll(Some('6'), t0 + Duration::from_millis(100)), None);
        // 200 ms since the '5' arm but only 100 ms since the '6' one.
        assert_eq!(entry.poll(Some('6'), t0 + Duration::from_millis(200)), None);
        assert_eq!(
            entry.poll(Some('6'), t0 + Duration::from_millis(300)),
            Some(EntryEvent::Digit('6'))
        );
    }

    /// Pins the observed-device gap: no entered code is ever compared to a
    /// secret. Any four digits followed by '#' are simply discarded.
    #[test]
    fn hash_never_compares_a_secret() {
        let mut entry = CodeEntry::new(DEBOUNCE);
        let mut t = Instant::now();
        for key in ['1', '2', '3', '4'] {
            press(&mut entry, key, &mut t);
        }
        assert_eq!(press(&mut entry, '#', &mut t), Some(EntryEvent::Discarded));
        assert!(entry.buffer().is_empty());
    }
}
