//! Search configuration for the itinerary planner.

use crate::shared::time::Duration;

/// Tuning knobs for multi-leg assembly.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Minimum layover at an intermediate stop (minutes, inclusive).
    /// Tighter connections are physically infeasible and rejected.
    pub min_layover_mins: u32,

    /// Maximum layover at an intermediate stop (minutes, inclusive).
    /// Longer waits are dead time nobody would book.
    pub max_layover_mins: u32,
}

impl SearchConfig {
    pub fn new(min_layover_mins: u32, max_layover_mins: u32) -> Self {
        Self {
            min_layover_mins,
            max_layover_mins,
        }
    }

    /// Returns the layover floor as a Duration.
    pub fn min_layover(&self) -> Duration {
        Duration::from_minutes(self.min_layover_mins)
    }

    /// Returns the layover ceiling as a Duration.
    pub fn max_layover(&self) -> Duration {
        Duration::from_minutes(self.max_layover_mins)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_layover_mins: 30,
            max_layover_mins: 540, // 9 hours
        }
    }
}
