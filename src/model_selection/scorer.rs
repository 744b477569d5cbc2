//! Scorers: scalar quality of predictions against held-out targets
//!
//! Every scorer follows the "higher is better" convention. Error metrics are
//! negated so the leaderboard can always sort descending.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{Error, Result};

/// Computes a scalar score for predictions against ground truth.
pub trait Scorer {
    /// Human-readable scorer name, e.g. `neg_mean_squared_error`.
    fn name(&self) -> &str;

    /// Score `y_pred` against `y_true`. Higher is better.
    ///
    /// # Errors
    ///
    /// Returns error if the slices are empty or differ in length, or if the
    /// metric is undefined for the given data.
    fn score(&self, y_true: &[f64], y_pred: &[f64]) -> Result<f64>;
}

impl<S: Scorer + ?Sized> Scorer for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn score(&self, y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
        (**self).score(y_true, y_pred)
    }
}

impl<S: Scorer + ?Sized> Scorer for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn score(&self, y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
        (**self).score(y_true, y_pred)
    }
}

/// Built-in scoring metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Fraction of exactly matching labels
    Accuracy,
    /// Negated mean squared error
    NegMeanSquaredError,
    /// Negated mean absolute error
    NegMeanAbsoluteError,
    /// Negated root mean squared error
    NegRootMeanSquaredError,
    /// Coefficient of determination
    R2,
}

impl Metric {
    /// Canonical metric name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Accuracy => "accuracy",
            Self::NegMeanSquaredError => "neg_mean_squared_error",
            Self::NegMeanAbsoluteError => "neg_mean_absolute_error",
            Self::NegRootMeanSquaredError => "neg_root_mean_squared_error",
            Self::R2 => "r2",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Scorer for Metric {
    fn name(&self) -> &str {
        self.as_str()
    }

    #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
    fn score(&self, y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
        check_lengths(y_true, y_pred)?;
        let n = y_true.len() as f64;
        let pairs = y_true.iter().zip(y_pred);

        let score = match self {
            Self::Accuracy => {
                let correct = pairs.filter(|(t, p)| t == p).count();
                correct as f64 / n
            }
            Self::NegMeanSquaredError => -pairs.map(|(t, p)| (t - p).powi(2)).sum::<f64>() / n,
            Self::NegMeanAbsoluteError => -pairs.map(|(t, p)| (t - p).abs()).sum::<f64>() / n,
            Self::NegRootMeanSquaredError => {
                -(pairs.map(|(t, p)| (t - p).powi(2)).sum::<f64>() / n).sqrt()
            }
            Self::R2 => r2(y_true, y_pred),
        };

        Ok(score)
    }
}

fn check_lengths(y_true: &[f64], y_pred: &[f64]) -> Result<()> {
    if y_true.is_empty() {
        return Err(Error::EmptyInput("cannot score zero samples".into()));
    }
    if y_true.len() != y_pred.len() {
        return Err(Error::Scoring(format!(
            "y_true has {} values but y_pred has {}",
            y_true.len(),
            y_pred.len()
        )));
    }
    Ok(())
}

/// Coefficient of determination; NaN when fewer than two samples.
#[allow(clippy::cast_precision_loss)]
fn r2(y_true: &[f64], y_pred: &[f64]) -> f64 {
    if y_true.len() < 2 {
        warn!(samples = y_true.len(), "R^2 is not well-defined with fewer than two samples");
        return f64::NAN;
    }

    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_res: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();

    // Constant targets: perfect predictions score 1, anything else 0
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}
