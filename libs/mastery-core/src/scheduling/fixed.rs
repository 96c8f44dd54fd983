//! Creation-time-only scheduling.
//!
//! The schedule is set once when a concept is first practiced and left
//! untouched by later reviews. Kept alongside the spaced policy for
//! callers that want the legacy behavior.

use chrono::{DateTime, Utc};

use super::{days_duration, ScheduleResult, SchedulingPolicy};
use crate::types::{ConceptMastery, Outcome};

#[derive(Debug, Clone)]
pub struct FixedInterval {
    pub interval_days: f64,
}

impl Default for FixedInterval {
    fn default() -> Self {
        Self { interval_days: 1.0 }
    }
}

impl SchedulingPolicy for FixedInterval {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn initial(&self, now: DateTime<Utc>) -> ScheduleResult {
        ScheduleResult {
            interval_days: self.interval_days,
            next_review: now + days_duration(self.interval_days),
        }
    }

    fn reschedule(
        &self,
        mastery: &ConceptMastery,
        _outcome: Outcome,
        _now: DateTime<Utc>,
    ) -> ScheduleResult {
        ScheduleResult {
            interval_days: mastery.interval_days,
            next_review: mastery.scheduled_next_review,
        }
    }
}
