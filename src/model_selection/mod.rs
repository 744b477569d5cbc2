//! Model selection: fold partitioning, scoring, and cross-validation
//!
//! ```text
//! KFold ──> CrossValidation ──> Vec<f64> (one score per fold)
//!              │        │
//!        Estimator    Scorer
//! ```

mod cross_val;
mod kfold;
mod scorer;

pub use cross_val::{cross_val_score, CrossValidation, ModelEvaluator};
pub use kfold::{Fold, KFold};
pub use scorer::{Metric, Scorer};
