//! Edge detection over the hazard flag.

/// Tracks the previous and current hazard state across polls.
///
/// Only a rising edge is reported, so a sustained hazard produces exactly
/// one event instead of one per poll cycle. Falling edges and steady
/// states are observed but never acted on.
#[derive(Debug, Default)]
pub struct AlarmEdge {
    previous: bool,
}

/// What one observation of the hazard flag amounted to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AlarmTransition {
    /// Hazard just went from quiet to active. The only logged transition.
    Onset,
    /// Hazard just cleared.
    Cleared,
    /// No change since the previous poll.
    Steady,
}

impl AlarmEdge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one poll's hazard flag and names the transition it caused.
    pub fn observe(&mut self, hazard: bool) -> AlarmTransition {
        let transition = match (self.previous, hazard) {
            (false, true) => AlarmTransition::Onset,
            (true, false) => AlarmTransition::Cleared,
            _ => AlarmTransition::Steady,
        };
        self.previous = hazard;
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rising_edges_are_onsets() {
        let mut edge = AlarmEdge::new();
        assert_eq!(edge.observe(false), AlarmTransition::Steady);
        assert_eq!(edge.observe(true), AlarmTransition::Onset);
        assert_eq!(edge.observe(true), AlarmTransition::Steady);
        assert_eq!(edge.observe(false), AlarmTransition::Cleared);
        assert_eq!(edge.observe(false), AlarmTransition::Steady);
        assert_eq!(edge.observe(true), AlarmTransition::Onset);
    }

    #[test]
    fn onset_count_matches_rising_edges_of_any_sequence() {
        let sequence = [false, false, true, true, false, true];
        let mut edge = AlarmEdge::new();
        let onsets: Vec<usize> = sequence
            .iter()
            .enumerate()
            .filter(|&(_, &hazard)| edge.observe(hazard) == AlarmTransition::Onset)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(onsets, vec![2, 5]);
    }
}
