//! Run tracking: cross-validation results logged into a ranked history
//!
//! ```text
//! RunTracker ──evaluate──> per-fold scores ──mean──> RunRecord
//!     │                                                  │
//!     └──────────────── History (sorted by score) <──────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use model_history::model_selection::Metric;
//! use model_history::RunTracker;
//!
//! let mut tracker = RunTracker::new(Metric::Accuracy);
//! tracker.log_report("svm", 0.91, "rbf kernel");
//! tracker.log_report("knn", 0.88, "k=5");
//!
//! assert_eq!(tracker.history().best().unwrap().name(), "svm");
//! ```

mod history;
mod run_record;
mod run_tracker;

pub use history::{descending_score, History, NAME_COLUMN, NOTES_COLUMN};
pub use run_record::{RunRecord, RunRecordBuilder};
pub use run_tracker::{
    format_accuracy, format_average_score, Output, ReportOptions, RunTracker, RunTrackerBuilder,
};
