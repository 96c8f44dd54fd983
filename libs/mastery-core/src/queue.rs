//! Study queue construction.
//!
//! Builds one session's worth of work for a learner: concepts due for
//! review ordered by priority, plus new concepts from the learner's track
//! whose prerequisites are already mastered, both under per-session
//! limits.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::catalog::CurriculumCatalog;
use crate::error::Result;
use crate::tracker::LearnerProfile;

/// Limits and thresholds for queue construction.
#[derive(Debug, Clone)]
pub struct QueuePlanner {
    pub reviews_per_session: usize,
    pub new_per_session: usize,
    /// Retention every prerequisite must reach before a concept unlocks.
    pub unlock_threshold: f64,
}

impl Default for QueuePlanner {
    fn default() -> Self {
        Self {
            reviews_per_session: 50,
            new_per_session: 10,
            unlock_threshold: 0.7,
        }
    }
}

/// A due concept with its review priority.
#[derive(Debug, Clone)]
pub struct QueuedReview {
    pub concept_id: String,
    /// importance_score x (1 - retention_score).
    pub priority: f64,
    pub scheduled_next_review: DateTime<Utc>,
}

/// Queue of concepts for one study session.
#[derive(Debug, Clone)]
pub struct StudyQueue {
    pub reviews: Vec<QueuedReview>,
    pub new_concepts: Vec<String>,
    /// Due reviews left out by the per-session limit.
    pub review_remaining: usize,
    /// Unlocked new concepts left out by the per-session limit.
    pub new_remaining: usize,
}

impl QueuePlanner {
    /// Build the session queue for a learner at `now`.
    pub fn build(
        &self,
        catalog: &CurriculumCatalog,
        profile: &LearnerProfile,
        now: DateTime<Utc>,
    ) -> Result<StudyQueue> {
        let mut reviews = Vec::new();
        for record in profile.mastery.values() {
            if !record.is_due(now) {
                continue;
            }
            let node = catalog.require(&record.concept_id)?;
            reviews.push(QueuedReview {
                concept_id: record.concept_id.clone(),
                priority: node.importance_score * (1.0 - record.retention_score),
                scheduled_next_review: record.scheduled_next_review,
            });
        }
        reviews.sort_by(|a, b| {
            b.priority
                .partial_cmp(&a.priority)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.concept_id.cmp(&b.concept_id))
        });

        let review_total = reviews.len();
        reviews.truncate(self.reviews_per_session);

        let mut unlocked = Vec::new();
        for node in catalog.nodes_for_track(profile.track) {
            if profile.mastery.contains_key(&node.id) {
                continue;
            }
            if catalog.is_unlocked(&node.id, &profile.mastery, self.unlock_threshold)? {
                unlocked.push(node);
            }
        }
        unlocked.sort_by(|a, b| {
            b.importance_score
                .partial_cmp(&a.importance_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        let new_total = unlocked.len();
        let new_concepts: Vec<String> = unlocked
            .into_iter()
            .take(self.new_per_session)
            .map(|node| node.id.clone())
            .collect();

        Ok(StudyQueue {
            review_remaining: review_total.saturating_sub(self.reviews_per_session),
            new_remaining: new_total.saturating_sub(self.new_per_session),
            reviews,
            new_concepts,
        })
    }
}
