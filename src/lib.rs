//! # model-history: Cross-Validation Run Tracker
//!
//! Exploratory model evaluation keeps asking the same question: which of the
//! candidates tried so far scores best? `model-history` answers it with a
//! [`RunTracker`] that cross-validates a model, logs the mean fold score next
//! to a label and free-text notes, and keeps the log sorted by score.
//!
//! ## Design Principles
//!
//! - **Injected collaborators**: fold partitioning ([`model_selection::KFold`]),
//!   evaluation ([`model_selection::ModelEvaluator`]), and scoring
//!   ([`model_selection::Scorer`]) are swappable, so tests run on stubs
//! - **Errors pass through**: evaluator failures reach the caller unchanged
//!   and leave the history untouched
//! - **Reproducible folds**: shuffling is seeded (`random_state`, default 45)
//!
//! ## Example Usage
//!
//! ```rust
//! use model_history::estimator::MeanRegressor;
//! use model_history::model_selection::Metric;
//! use model_history::RunTracker;
//!
//! let x: Vec<Vec<f64>> = (0..10).map(|i| vec![f64::from(i)]).collect();
//! let y: Vec<f64> = (0..10).map(f64::from).collect();
//!
//! let mut tracker = RunTracker::new(Metric::NegMeanSquaredError);
//! let scores = tracker.report(&MeanRegressor::new(), &x, &y, "baseline")?;
//! assert_eq!(scores.len(), 5);
//!
//! println!("{}", tracker.history());
//! # Ok::<(), model_history::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod error;
pub mod estimator;
pub mod model_selection;
pub mod tracker;

pub use config::TrackerConfig;
pub use error::{Error, Result};
pub use tracker::{History, ReportOptions, RunRecord, RunTracker, RunTrackerBuilder};
