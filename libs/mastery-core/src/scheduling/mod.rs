//! Review scheduling policies.

pub mod fixed;
pub mod spaced;

use chrono::{DateTime, Utc};

use crate::types::{ConceptMastery, Outcome};

/// Result of scheduling a concept after a review.
#[derive(Debug, Clone)]
pub struct ScheduleResult {
    pub interval_days: f64,
    pub next_review: DateTime<Utc>,
}

/// Trait for review scheduling policies.
pub trait SchedulingPolicy: Send + Sync {
    /// Policy identifier.
    fn name(&self) -> &'static str;

    /// Schedule for a concept practiced for the first time.
    fn initial(&self, now: DateTime<Utc>) -> ScheduleResult;

    /// Recompute the schedule after a graded review. The mastery record
    /// carries the post-update retention and adaptive level.
    fn reschedule(
        &self,
        mastery: &ConceptMastery,
        outcome: Outcome,
        now: DateTime<Utc>,
    ) -> ScheduleResult;
}

/// Get policy by name.
pub fn get_policy(name: &str) -> Option<Box<dyn SchedulingPolicy>> {
    match name {
        "fixed" => Some(Box::new(fixed::FixedInterval::default())),
        "spaced" => Some(Box::new(spaced::SpacedInterval::default())),
        _ => None,
    }
}

/// Convert a fractional day count into a chrono duration.
pub(crate) fn days_duration(days: f64) -> chrono::Duration {
    chrono::Duration::seconds((days * 86400.0) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_registry_resolves_known_names() {
        assert_eq!(get_policy("spaced").unwrap().name(), "spaced");
        assert_eq!(get_policy("fixed").unwrap().name(), "fixed");
        assert!(get_policy("sm2").is_none());
    }
}
