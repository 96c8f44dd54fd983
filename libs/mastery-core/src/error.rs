//! Error types for mastery-core.

use thiserror::Error;

/// Result type alias using MasteryError.
pub type Result<T> = std::result::Result<T, MasteryError>;

/// Errors surfaced by the catalog and the mastery update engine.
#[derive(Debug, Error)]
pub enum MasteryError {
    #[error("effort score {value} outside [0, 1]")]
    EffortOutOfRange { value: f64 },

    #[error("unknown concept {id}")]
    UnknownConcept { id: String },

    #[error("duplicate concept {id} in catalog")]
    DuplicateConcept { id: String },

    #[error("concept {id} lists unknown prerequisite {prerequisite}")]
    UnknownPrerequisite { id: String, prerequisite: String },

    #[error("prerequisite cycle through concept {id}")]
    PrerequisiteCycle { id: String },

    #[error("invalid catalog: {0}")]
    InvalidCatalog(#[from] serde_json::Error),
}
