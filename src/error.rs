//! Error types for model-history
//!
//! Errors are raised by the collaborators (fold partitioner, evaluator,
//! estimators, scorers) and travel through the tracker untouched.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// model-history error types
#[derive(Error, Debug)]
pub enum Error {
    /// Fold count outside `2..=n_samples`
    #[error("Cannot split {n_samples} samples into {n_splits} folds\nn_splits must be at least 2 and at most the number of samples")]
    InvalidFolds {
        /// Requested number of folds
        n_splits: usize,
        /// Number of available samples
        n_samples: usize,
    },

    /// Feature rows and targets disagree in length
    #[error("Found inconsistent numbers of samples: {features} feature rows, {targets} targets")]
    ShapeMismatch {
        /// Number of feature rows
        features: usize,
        /// Number of targets
        targets: usize,
    },

    /// A feature row has a different width than the first row
    #[error("Feature row {row} has {got} columns, expected {expected}")]
    RaggedFeatures {
        /// Offending row index
        row: usize,
        /// Width of the first row
        expected: usize,
        /// Width of the offending row
        got: usize,
    },

    /// Empty input where at least one sample is required
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Estimator failed to fit or predict
    #[error("Estimator error: {0}")]
    Estimator(String),

    /// Scorer failed to compute a score
    #[error("Scoring error: {0}")]
    Scoring(String),

    /// Invalid tracker configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error writing report lines
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error while exporting the history table
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
