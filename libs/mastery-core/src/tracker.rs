//! Mastery update engine.
//!
//! One `record_outcome` call per graded practice event: validates the
//! event, lazily initializes state for first-seen concepts, appends to the
//! review log, applies the asymmetric retention update and the adaptive
//! level ratchet, then delegates due-date recomputation to the scheduling
//! policy. Pure and deterministic; the caller supplies `now` and persists
//! the returned record.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::CurriculumCatalog;
use crate::error::{MasteryError, Result};
use crate::scheduling::SchedulingPolicy;
use crate::types::{ConceptMastery, Outcome, OutcomeEvent, ReviewEvent, Track};

/// Tuning parameters for the mastery update rule.
///
/// The forgetting penalty exceeds the learning gain so the system
/// over-reviews rather than prematurely declaring mastery.
#[derive(Debug, Clone)]
pub struct TrackerParams {
    pub initial_retention: f64,
    pub retention_gain: f64,
    pub retention_penalty: f64,
    /// Effort required (exclusive) for a correct answer to raise the level.
    pub level_up_effort: f64,
    pub max_adaptive_level: u8,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            initial_retention: 0.5,
            retention_gain: 0.1,
            retention_penalty: 0.15,
            level_up_effort: 0.7,
            max_adaptive_level: 5,
        }
    }
}

/// The mastery tracker: catalog, scheduling policy, and update parameters.
pub struct MasteryTracker {
    catalog: CurriculumCatalog,
    policy: Box<dyn SchedulingPolicy>,
    params: TrackerParams,
}

impl MasteryTracker {
    pub fn new(catalog: CurriculumCatalog, policy: Box<dyn SchedulingPolicy>) -> Self {
        Self::with_params(catalog, policy, TrackerParams::default())
    }

    pub fn with_params(
        catalog: CurriculumCatalog,
        policy: Box<dyn SchedulingPolicy>,
        params: TrackerParams,
    ) -> Self {
        Self {
            catalog,
            policy,
            params,
        }
    }

    pub fn catalog(&self) -> &CurriculumCatalog {
        &self.catalog
    }

    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    /// Apply one graded practice event to a concept's mastery state.
    ///
    /// Absence of prior state is the expected initial condition, not an
    /// error. The updated record is returned for the caller to persist.
    pub fn record_outcome(
        &self,
        prior: Option<&ConceptMastery>,
        event: &OutcomeEvent,
        now: DateTime<Utc>,
    ) -> Result<ConceptMastery> {
        if !(0.0..=1.0).contains(&event.effort_score) {
            return Err(MasteryError::EffortOutOfRange {
                value: event.effort_score,
            });
        }
        let node = self.catalog.require(&event.concept_id)?;

        let mut mastery = match prior {
            Some(record) => record.clone(),
            None => {
                let schedule = self.policy.initial(now);
                ConceptMastery {
                    concept_id: event.concept_id.clone(),
                    topic: event.topic.clone(),
                    difficulty: node.difficulty,
                    retention_score: self.params.initial_retention,
                    last_reviewed: now,
                    scheduled_next_review: schedule.next_review,
                    interval_days: schedule.interval_days,
                    adaptive_level: 1,
                    review_history: Vec::new(),
                }
            }
        };

        mastery.review_history.push(ReviewEvent {
            date: now,
            outcome: event.outcome,
            effort_score: event.effort_score,
        });
        mastery.last_reviewed = now;

        mastery.retention_score = match event.outcome {
            Outcome::Correct => {
                (mastery.retention_score + self.params.retention_gain).min(1.0)
            }
            Outcome::Wrong => {
                (mastery.retention_score - self.params.retention_penalty).max(0.0)
            }
        };

        if event.outcome.is_correct() && event.effort_score > self.params.level_up_effort {
            mastery.adaptive_level =
                (mastery.adaptive_level + 1).min(self.params.max_adaptive_level);
        }

        let schedule = self.policy.reschedule(&mastery, event.outcome, now);
        mastery.interval_days = schedule.interval_days;
        mastery.scheduled_next_review = schedule.next_review;

        Ok(mastery)
    }
}

/// A learner's exclusively-owned mastery map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerProfile {
    pub learner_id: Uuid,
    pub track: Track,
    pub mastery: HashMap<String, ConceptMastery>,
}

impl LearnerProfile {
    pub fn new(learner_id: Uuid, track: Track) -> Self {
        Self {
            learner_id,
            track,
            mastery: HashMap::new(),
        }
    }

    pub fn get(&self, concept_id: &str) -> Option<&ConceptMastery> {
        self.mastery.get(concept_id)
    }

    /// Route one event through the tracker and store the updated record.
    pub fn record(
        &mut self,
        tracker: &MasteryTracker,
        event: &OutcomeEvent,
        now: DateTime<Utc>,
    ) -> Result<&ConceptMastery> {
        let updated = tracker.record_outcome(self.mastery.get(&event.concept_id), event, now)?;
        match self.mastery.entry(event.concept_id.clone()) {
            Entry::Occupied(mut slot) => {
                slot.insert(updated);
                Ok(slot.into_mut())
            }
            Entry::Vacant(slot) => Ok(slot.insert(updated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::get_policy;
    use crate::types::{ConceptNode, Difficulty};
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn catalog() -> CurriculumCatalog {
        CurriculumCatalog::new(vec![
            ConceptNode {
                id: "m-algebra".to_string(),
                subject: "Mathematics".to_string(),
                topic: "Algebra".to_string(),
                difficulty: Difficulty::Medium,
                prerequisites: vec![],
                importance_score: 0.9,
            },
            ConceptNode {
                id: "p-circular".to_string(),
                subject: "Physics".to_string(),
                topic: "Circular Motion".to_string(),
                difficulty: Difficulty::Hard,
                prerequisites: vec!["m-algebra".to_string()],
                importance_score: 0.8,
            },
        ])
        .unwrap()
    }

    fn tracker() -> MasteryTracker {
        MasteryTracker::new(catalog(), get_policy("spaced").unwrap())
    }

    fn event(concept_id: &str, outcome: Outcome, effort_score: f64) -> OutcomeEvent {
        OutcomeEvent {
            concept_id: concept_id.to_string(),
            topic: "Algebra".to_string(),
            outcome,
            effort_score,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn fresh_concept_first_correct_event() {
        let tracker = tracker();
        let record = tracker
            .record_outcome(None, &event("m-algebra", Outcome::Correct, 0.9), now())
            .unwrap();

        assert_close(record.retention_score, 0.6);
        assert_eq!(record.adaptive_level, 2);
        assert_eq!(record.review_history.len(), 1);
        assert_eq!(record.difficulty, Difficulty::Medium);
    }

    #[test]
    fn fresh_concept_first_wrong_event() {
        let tracker = tracker();
        let record = tracker
            .record_outcome(None, &event("m-algebra", Outcome::Wrong, 0.2), now())
            .unwrap();

        assert_close(record.retention_score, 0.35);
        assert_eq!(record.adaptive_level, 1);
        assert_eq!(record.review_history.len(), 1);
    }

    #[test]
    fn three_consecutive_wrongs() {
        let tracker = tracker();
        let ts = now();
        let mut record = tracker
            .record_outcome(None, &event("m-algebra", Outcome::Wrong, 0.3), ts)
            .unwrap();
        for _ in 0..2 {
            record = tracker
                .record_outcome(Some(&record), &event("m-algebra", Outcome::Wrong, 0.3), ts)
                .unwrap();
        }
        assert_close(record.retention_score, 0.05);
    }

    #[test]
    fn retention_is_monotone_and_capped_under_correct_streak() {
        let tracker = tracker();
        let ts = now();
        let mut record = tracker
            .record_outcome(None, &event("m-algebra", Outcome::Correct, 0.5), ts)
            .unwrap();
        let mut previous = record.retention_score;
        for _ in 0..12 {
            record = tracker
                .record_outcome(
                    Some(&record),
                    &event("m-algebra", Outcome::Correct, 0.5),
                    ts,
                )
                .unwrap();
            assert!(record.retention_score >= previous);
            assert!(record.retention_score <= 1.0);
            previous = record.retention_score;
        }
        assert_close(record.retention_score, 1.0);
    }

    #[test]
    fn retention_is_monotone_and_floored_under_wrong_streak() {
        let tracker = tracker();
        let ts = now();
        let mut record = tracker
            .record_outcome(None, &event("m-algebra", Outcome::Wrong, 0.3), ts)
            .unwrap();
        let mut previous = record.retention_score;
        for _ in 0..8 {
            record = tracker
                .record_outcome(Some(&record), &event("m-algebra", Outcome::Wrong, 0.3), ts)
                .unwrap();
            assert!(record.retention_score <= previous);
            assert!(record.retention_score >= 0.0);
            previous = record.retention_score;
        }
        assert_eq!(record.retention_score, 0.0);
    }

    #[test]
    fn history_length_matches_event_count() {
        let tracker = tracker();
        let ts = now();
        let mut record = tracker
            .record_outcome(None, &event("m-algebra", Outcome::Correct, 0.8), ts)
            .unwrap();
        for i in 1..10 {
            let outcome = if i % 2 == 0 { Outcome::Correct } else { Outcome::Wrong };
            record = tracker
                .record_outcome(Some(&record), &event("m-algebra", outcome, 0.5), ts)
                .unwrap();
        }
        assert_eq!(record.review_history.len(), 10);
    }

    #[test]
    fn adaptive_level_ratchets_up_to_cap() {
        let tracker = tracker();
        let ts = now();
        let mut record = tracker
            .record_outcome(None, &event("m-algebra", Outcome::Correct, 0.9), ts)
            .unwrap();
        let mut previous = record.adaptive_level;
        for _ in 0..8 {
            record = tracker
                .record_outcome(
                    Some(&record),
                    &event("m-algebra", Outcome::Correct, 0.9),
                    ts,
                )
                .unwrap();
            assert!(record.adaptive_level >= previous);
            previous = record.adaptive_level;
        }
        assert_eq!(record.adaptive_level, 5);

        // Failure at the cap does not walk the level back down.
        record = tracker
            .record_outcome(Some(&record), &event("m-algebra", Outcome::Wrong, 0.2), ts)
            .unwrap();
        assert_eq!(record.adaptive_level, 5);
    }

    #[test]
    fn low_effort_correct_does_not_level_up() {
        let tracker = tracker();
        let record = tracker
            .record_outcome(None, &event("m-algebra", Outcome::Correct, 0.7), now())
            .unwrap();
        // Threshold is exclusive.
        assert_eq!(record.adaptive_level, 1);
    }

    #[test]
    fn initialization_is_deterministic() {
        let tracker = tracker();
        let ts = now();
        let ev = event("m-algebra", Outcome::Correct, 0.9);
        let first = tracker.record_outcome(None, &ev, ts).unwrap();
        let second = tracker.record_outcome(None, &ev, ts).unwrap();
        assert_eq!(first.retention_score, second.retention_score);
        assert_eq!(first.adaptive_level, second.adaptive_level);
        assert_eq!(first.scheduled_next_review, second.scheduled_next_review);
    }

    #[test]
    fn effort_out_of_range_fails_fast() {
        let tracker = tracker();
        let result = tracker.record_outcome(None, &event("m-algebra", Outcome::Correct, 1.2), now());
        assert!(matches!(
            result,
            Err(MasteryError::EffortOutOfRange { .. })
        ));
        let result =
            tracker.record_outcome(None, &event("m-algebra", Outcome::Correct, -0.1), now());
        assert!(result.is_err());
    }

    #[test]
    fn unknown_concept_is_surfaced() {
        let tracker = tracker();
        let result = tracker.record_outcome(None, &event("ghost", Outcome::Correct, 0.5), now());
        assert!(matches!(result, Err(MasteryError::UnknownConcept { .. })));
    }

    #[test]
    fn correct_answer_pushes_review_further_out() {
        let tracker = tracker();
        let ts = now();
        let first = tracker
            .record_outcome(None, &event("m-algebra", Outcome::Correct, 0.9), ts)
            .unwrap();
        let second = tracker
            .record_outcome(
                Some(&first),
                &event("m-algebra", Outcome::Correct, 0.9),
                ts + Duration::days(2),
            )
            .unwrap();
        assert!(second.interval_days > first.interval_days);
        assert!(second.scheduled_next_review > second.last_reviewed);
    }

    #[test]
    fn wrong_answer_resets_schedule_to_one_day() {
        let tracker = tracker();
        let ts = now();
        let mut record = tracker
            .record_outcome(None, &event("m-algebra", Outcome::Correct, 0.9), ts)
            .unwrap();
        for _ in 0..3 {
            record = tracker
                .record_outcome(
                    Some(&record),
                    &event("m-algebra", Outcome::Correct, 0.9),
                    ts,
                )
                .unwrap();
        }
        assert!(record.interval_days > 1.0);

        let failed = tracker
            .record_outcome(Some(&record), &event("m-algebra", Outcome::Wrong, 0.4), ts)
            .unwrap();
        assert_eq!(failed.interval_days, 1.0);
        assert_eq!(failed.scheduled_next_review, ts + Duration::days(1));
    }

    #[test]
    fn fixed_policy_keeps_creation_schedule() {
        let tracker = MasteryTracker::new(catalog(), get_policy("fixed").unwrap());
        let ts = now();
        let first = tracker
            .record_outcome(None, &event("m-algebra", Outcome::Correct, 0.9), ts)
            .unwrap();
        let due = first.scheduled_next_review;

        let second = tracker
            .record_outcome(
                Some(&first),
                &event("m-algebra", Outcome::Correct, 0.9),
                ts + Duration::hours(6),
            )
            .unwrap();
        assert_eq!(second.scheduled_next_review, due);
        assert_eq!(second.interval_days, first.interval_days);
    }

    #[test]
    fn profile_creates_then_updates_records() {
        let tracker = tracker();
        let ts = now();
        let mut profile = LearnerProfile::new(Uuid::new_v4(), Track::Science);

        profile
            .record(&tracker, &event("m-algebra", Outcome::Correct, 0.9), ts)
            .unwrap();
        assert_eq!(profile.mastery.len(), 1);

        profile
            .record(&tracker, &event("m-algebra", Outcome::Wrong, 0.3), ts)
            .unwrap();
        assert_eq!(profile.mastery.len(), 1);
        let record = profile.get("m-algebra").unwrap();
        assert_eq!(record.review_history.len(), 2);
        assert_close(record.retention_score, 0.45);

        profile
            .record(&tracker, &event("p-circular", Outcome::Correct, 0.5), ts)
            .unwrap();
        assert_eq!(profile.mastery.len(), 2);
    }
}
