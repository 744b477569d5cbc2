//! Run Record - one logged evaluation result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Run Record represents one logged evaluation of a model.
///
/// Names are free text and not required to be unique. Records are immutable
/// once inserted into a history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    name: String,
    score: f64,
    notes: String,
    folds: Option<usize>,
    logged_at: DateTime<Utc>,
}

impl RunRecord {
    /// Create a record with empty notes, timestamped now.
    ///
    /// # Arguments
    ///
    /// * `name` - Label of the evaluated model or configuration
    /// * `score` - Mean cross-validation score
    #[must_use]
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self::builder(name, score).build()
    }

    /// Create a builder for constructing a record with optional fields.
    #[must_use]
    pub fn builder(name: impl Into<String>, score: f64) -> RunRecordBuilder {
        RunRecordBuilder::new(name, score)
    }

    /// Get the record label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the mean score.
    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    /// Get the free-text notes.
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Number of folds the score was averaged over, if it came from `report`.
    #[must_use]
    pub const fn folds(&self) -> Option<usize> {
        self.folds
    }

    /// Get the insertion timestamp.
    #[must_use]
    pub const fn logged_at(&self) -> DateTime<Utc> {
        self.logged_at
    }
}

/// Builder for `RunRecord`.
#[derive(Debug)]
pub struct RunRecordBuilder {
    name: String,
    score: f64,
    notes: String,
    folds: Option<usize>,
}

impl RunRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            score,
            notes: String::new(),
            folds: None,
        }
    }

    /// Set the free-text notes.
    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Set the number of folds behind the score.
    #[must_use]
    pub const fn folds(mut self, folds: usize) -> Self {
        self.folds = Some(folds);
        self
    }

    /// Build the `RunRecord`.
    #[must_use]
    pub fn build(self) -> RunRecord {
        RunRecord {
            name: self.name,
            score: self.score,
            notes: self.notes,
            folds: self.folds,
            logged_at: Utc::now(),
        }
    }
}
