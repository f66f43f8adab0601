//! One-shot reveal-on-scroll bookkeeping.

use std::collections::HashSet;

pub const REVEAL_THRESHOLD: f64 = 0.12;

#[derive(Debug, Default)]
pub struct RevealTracker {
    revealed: HashSet<String>,
}

impl RevealTracker {
    /// Reports an intersection ratio for `id`. Returns true only the first
    /// time the element becomes visible; it is not observed after that.
    pub fn observe(&mut self, id: &str, ratio: f64) -> bool {
        if ratio < REVEAL_THRESHOLD || self.revealed.contains(id) {
            return false;
        }
        self.revealed.insert(id.to_string())
    }

    #[must_use]
    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_once_at_threshold() {
        let mut tracker = RevealTracker::default();
        assert!(!tracker.observe("hero", 0.05));
        assert!(tracker.observe("hero", REVEAL_THRESHOLD));
        assert!(!tracker.observe("hero", 1.0));
        assert!(!tracker.observe("hero", 0.0));
        assert!(tracker.is_revealed("hero"));
        assert!(!tracker.is_revealed("footer"));
    }
}
