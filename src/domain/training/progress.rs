//! Per-(user, product) training progress.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Percentage;

use super::{ConvictionResult, Level};

/// Snapshot of progress for one (user, product) pair.
///
/// Exactly one record exists per pair; every change overwrites the whole
/// snapshot. `levels_passed` is a growing, sorted, deduplicated record of
/// passed levels; routing decisions consume only the highest entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub levels_passed: Vec<Level>,
    pub progress_percentage: Percentage,
}

impl Progress {
    /// The well-defined "never started" state returned for missing keys.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the most recently passed level, if any.
    pub fn highest_passed(&self) -> Option<Level> {
        self.levels_passed.last().copied()
    }

    /// Folds one conviction result at `level` into the snapshot.
    ///
    /// Convinced: the level is spent, recorded as passed, and the fraction
    /// resets to zero. Otherwise the fraction is overwritten (not
    /// accumulated) with the score. Returns the level the session should run
    /// at from now on.
    pub fn apply(&mut self, level: Level, conviction: &ConvictionResult) -> Level {
        if conviction.convinced {
            self.record_pass(level);
            self.progress_percentage = Percentage::ZERO;
            level.next()
        } else {
            self.progress_percentage = conviction.conviction_score;
            level
        }
    }

    fn record_pass(&mut self, level: Level) {
        if !self.levels_passed.contains(&level) {
            self.levels_passed.push(level);
            self.levels_passed.sort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(n: u32) -> Level {
        Level::new(n).unwrap()
    }

    #[test]
    fn empty_progress_has_no_levels_and_zero_fraction() {
        let progress = Progress::empty();
        assert!(progress.levels_passed.is_empty());
        assert_eq!(progress.progress_percentage, Percentage::ZERO);
        assert_eq!(progress.highest_passed(), None);
    }

    #[test]
    fn unconvinced_turn_overwrites_fraction_and_keeps_level() {
        let mut progress = Progress::empty();
        progress.progress_percentage = Percentage::new(40);

        let conviction = ConvictionResult::new(Percentage::new(85), "warming up", false);
        let next = progress.apply(level(2), &conviction);

        assert_eq!(next, level(2));
        assert_eq!(progress.progress_percentage.value(), 85);
        assert!(progress.levels_passed.is_empty());
    }

    #[test]
    fn convinced_turn_records_pass_advances_and_resets_fraction() {
        let mut progress = Progress::empty();
        progress.progress_percentage = Percentage::new(70);

        let conviction = ConvictionResult::new(Percentage::new(95), "sold", true);
        let next = progress.apply(level(2), &conviction);

        assert_eq!(next, level(3));
        assert_eq!(progress.levels_passed, vec![level(2)]);
        assert_eq!(progress.progress_percentage, Percentage::ZERO);
    }

    #[test]
    fn passing_same_level_twice_does_not_duplicate() {
        let mut progress = Progress::empty();
        let conviction = ConvictionResult::new(Percentage::HUNDRED, "sold", true);

        progress.apply(level(1), &conviction);
        progress.apply(level(1), &conviction);

        assert_eq!(progress.levels_passed, vec![level(1)]);
    }

    #[test]
    fn passed_levels_stay_sorted() {
        let mut progress = Progress::empty();
        let conviction = ConvictionResult::new(Percentage::HUNDRED, "sold", true);

        progress.apply(level(3), &conviction);
        progress.apply(level(1), &conviction);
        progress.apply(level(2), &conviction);

        assert_eq!(progress.levels_passed, vec![level(1), level(2), level(3)]);
        assert_eq!(progress.highest_passed(), Some(level(3)));
    }
}
