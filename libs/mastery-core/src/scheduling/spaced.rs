//! Spaced-repetition scheduling with level-tuned interval growth.
//!
//! Correct answers multiply the interval by a growth factor that rises
//! with the concept's adaptive level (1.8 at level 1 up to 2.5 at level
//! 5); a wrong answer resets the interval to one day.

use chrono::{DateTime, Utc};

use super::{days_duration, ScheduleResult, SchedulingPolicy};
use crate::types::{ConceptMastery, Outcome};

/// Spaced-interval policy with configurable parameters.
#[derive(Debug, Clone)]
pub struct SpacedInterval {
    pub initial_interval: f64,
    pub base_growth: f64,
    pub growth_per_level: f64,
    pub maximum_interval: f64,
}

impl Default for SpacedInterval {
    fn default() -> Self {
        Self {
            initial_interval: 1.0,
            base_growth: 1.8,
            growth_per_level: 0.175,
            maximum_interval: 365.0,
        }
    }
}

impl SpacedInterval {
    /// Growth factor for an adaptive level, clamped to the 1-5 range.
    pub fn growth_factor(&self, adaptive_level: u8) -> f64 {
        let level = adaptive_level.clamp(1, 5);
        self.base_growth + self.growth_per_level * f64::from(level - 1)
    }
}

impl SchedulingPolicy for SpacedInterval {
    fn name(&self) -> &'static str {
        "spaced"
    }

    fn initial(&self, now: DateTime<Utc>) -> ScheduleResult {
        ScheduleResult {
            interval_days: self.initial_interval,
            next_review: now + days_duration(self.initial_interval),
        }
    }

    fn reschedule(
        &self,
        mastery: &ConceptMastery,
        outcome: Outcome,
        now: DateTime<Utc>,
    ) -> ScheduleResult {
        let interval_days = match outcome {
            Outcome::Correct => {
                let grown = mastery.interval_days * self.growth_factor(mastery.adaptive_level);
                grown.max(self.initial_interval).min(self.maximum_interval)
            }
            Outcome::Wrong => self.initial_interval,
        };

        ScheduleResult {
            interval_days,
            next_review: now + days_duration(interval_days),
        }
    }
}
