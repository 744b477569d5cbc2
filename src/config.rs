//! Tracker configuration

use serde::{Deserialize, Serialize};

use crate::model_selection::KFold;
use crate::{Error, Result};

/// Default seed for fold shuffling
pub const DEFAULT_RANDOM_STATE: u64 = 45;

/// Default number of cross-validation folds
pub const DEFAULT_CV: usize = 5;

/// Default label of the score column in the history table
pub const DEFAULT_SCORE_COLUMN: &str = "Accuracy";

/// Settings shared by every `report` call of a tracker.
///
/// All fields are optional when deserializing:
///
/// ```rust
/// use model_history::TrackerConfig;
///
/// let config = TrackerConfig::from_json(r#"{ "cv": 3, "score_column": "Score" }"#)?;
/// assert_eq!(config.cv, 3);
/// assert_eq!(config.random_state, 45);
/// # Ok::<(), model_history::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Seed for fold shuffling
    pub random_state: u64,
    /// Default fold count for `report`
    pub cv: usize,
    /// Label of the score column
    pub score_column: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            random_state: DEFAULT_RANDOM_STATE,
            cv: DEFAULT_CV,
            score_column: DEFAULT_SCORE_COLUMN.to_string(),
        }
    }
}

impl TrackerConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed, has unknown fields, or names
    /// an empty score column.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde cannot express.
    ///
    /// Fold counts are deliberately left to the partitioner, which knows the
    /// sample count.
    ///
    /// # Errors
    ///
    /// Returns error if the score column label is blank.
    pub fn validate(&self) -> Result<()> {
        if self.score_column.trim().is_empty() {
            return Err(Error::Config("score_column must not be empty".into()));
        }
        Ok(())
    }

    /// Shuffling fold partitioner for `n_splits` folds seeded with
    /// `random_state`.
    #[must_use]
    pub const fn kfold(&self, n_splits: usize) -> KFold {
        KFold::new(n_splits).with_seed(self.random_state)
    }
}
