//! Core types for the mastery tracking engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Concept difficulty tier in the curriculum catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

/// Outcome of a graded practice attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Wrong,
}

impl Outcome {
    /// Get the outcome name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Wrong => "wrong",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "correct" => Some(Self::Correct),
            "wrong" => Some(Self::Wrong),
            _ => None,
        }
    }

    /// Map a boolean grading result to an outcome.
    pub fn from_correct(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Wrong }
    }

    pub fn is_correct(self) -> bool {
        self == Self::Correct
    }
}

/// Academic track a learner is enrolled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Science,
    Arts,
}

/// Node in the curriculum prerequisite graph.
///
/// Loaded once from the catalog at process start; never mutated at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptNode {
    pub id: String,
    pub subject: String,
    pub topic: String,
    pub difficulty: Difficulty,
    /// Concept ids that should be mastered first.
    #[serde(default)]
    pub prerequisites: Vec<String>,
    /// Relative exam weight in [0, 1].
    pub importance_score: f64,
}

/// Immutable record of one practice attempt against a concept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewEvent {
    pub date: DateTime<Utc>,
    pub outcome: Outcome,
    /// Engagement quality for the attempt, in [0, 1].
    pub effort_score: f64,
}

/// Input event produced by the grading flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeEvent {
    pub concept_id: String,
    pub topic: String,
    pub outcome: Outcome,
    pub effort_score: f64,
}

/// Per-learner rolling mastery state for one concept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptMastery {
    pub concept_id: String,
    pub topic: String,
    /// Cached from the concept node at creation time.
    pub difficulty: Difficulty,
    /// Estimated recall strength in [0, 1].
    pub retention_score: f64,
    pub last_reviewed: DateTime<Utc>,
    pub scheduled_next_review: DateTime<Utc>,
    pub interval_days: f64,
    /// Difficulty calibration tier for future question generation, 1-5.
    pub adaptive_level: u8,
    /// Append-only practice log.
    pub review_history: Vec<ReviewEvent>,
}

impl ConceptMastery {
    /// Whether the concept is eligible for review at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_next_review <= now
    }
}
