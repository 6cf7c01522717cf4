//! Enumeration statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Counters collected during one enumeration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EnumerationStats {
    /// Board clones made (one per explored die outcome).
    pub clones: u64,

    /// Non-terminal outcomes that were explored further.
    pub branches: u64,

    /// Outcomes that ended the race by running off the track.
    pub terminal: u64,

    /// Rankings recorded at the end of a round.
    pub leaves: u64,

    /// Deepest number of dice rolled below the starting board.
    pub max_depth: u16,

    /// Total time spent enumerating (microseconds).
    pub time_us: u64,
}

impl EnumerationStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Distinct rankings recorded (terminal plus end-of-round).
    #[must_use]
    pub fn outcomes(&self) -> u64 {
        self.terminal + self.leaves
    }

    /// Calculate board clones per second.
    #[must_use]
    pub fn clones_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.clones as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = EnumerationStats::new();
        assert_eq!(stats.clones, 0);
        assert_eq!(stats.outcomes(), 0);
    }

    #[test]
    fn test_clones_per_second() {
        let mut stats = EnumerationStats::new();
        stats.clones = 500;
        stats.time_us = 500_000;

        assert_eq!(stats.clones_per_second(), 1000.0);
    }

    #[test]
    fn test_stats_reset() {
        let mut stats = EnumerationStats::new();
        stats.terminal = 3;
        stats.leaves = 9;

        assert_eq!(stats.outcomes(), 12);
        stats.reset();
        assert_eq!(stats.outcomes(), 0);
    }
}
