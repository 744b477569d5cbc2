//! Estimator contract and baseline models
//!
//! The evaluator clones an [`Estimator`] once per fold, so a model passed to
//! the tracker is never mutated by cross-validation.

use crate::{Error, Result};

/// A trainable, predictable model.
pub trait Estimator: Clone {
    /// Fit the model on feature rows `x` and targets `y`.
    ///
    /// # Errors
    ///
    /// Returns error if the model cannot be trained on the given data.
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()>;

    /// Predict one target per feature row.
    ///
    /// # Errors
    ///
    /// Returns error if the model is not fitted or the rows are malformed.
    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>>;
}

fn not_fitted(model: &str) -> Error {
    Error::Estimator(format!("{model} must be fitted before calling predict"))
}

/// Predicts the mean of the training targets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeanRegressor {
    mean: Option<f64>,
}

impl MeanRegressor {
    /// Create an unfitted regressor.
    #[must_use]
    pub const fn new() -> Self {
        Self { mean: None }
    }

    /// Fitted mean, if any.
    #[must_use]
    pub const fn mean(&self) -> Option<f64> {
        self.mean
    }
}

impl Estimator for MeanRegressor {
    #[allow(clippy::cast_precision_loss)]
    fn fit(&mut self, _x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        if y.is_empty() {
            return Err(Error::EmptyInput("MeanRegressor needs at least one target".into()));
        }
        self.mean = Some(y.iter().sum::<f64>() / y.len() as f64);
        Ok(())
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        let mean = self.mean.ok_or_else(|| not_fitted("MeanRegressor"))?;
        Ok(vec![mean; x.len()])
    }
}

/// Predicts the most frequent training label (smallest label on ties).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MajorityClassifier {
    label: Option<f64>,
}

impl MajorityClassifier {
    /// Create an unfitted classifier.
    #[must_use]
    pub const fn new() -> Self {
        Self { label: None }
    }

    /// Fitted majority label, if any.
    #[must_use]
    pub const fn label(&self) -> Option<f64> {
        self.label
    }
}

impl Estimator for MajorityClassifier {
    #[allow(clippy::float_cmp)]
    fn fit(&mut self, _x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        let mut counts: Vec<(f64, usize)> = Vec::new();
        for &label in y {
            match counts.iter_mut().find(|(l, _)| *l == label) {
                Some((_, count)) => *count += 1,
                None => counts.push((label, 1)),
            }
        }

        let best = counts
            .into_iter()
            .reduce(|best, cand| {
                if cand.1 > best.1 || (cand.1 == best.1 && cand.0 < best.0) {
                    cand
                } else {
                    best
                }
            })
            .ok_or_else(|| {
                Error::EmptyInput("MajorityClassifier needs at least one target".into())
            })?;

        self.label = Some(best.0);
        Ok(())
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        let label = self.label.ok_or_else(|| not_fitted("MajorityClassifier"))?;
        Ok(vec![label; x.len()])
    }
}

/// Ordinary least squares on a single feature column plus intercept.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    feature: usize,
    coefficients: Option<(f64, f64)>,
}

impl LinearRegression {
    /// Regress on feature column `feature`.
    #[must_use]
    pub const fn new(feature: usize) -> Self {
        Self {
            feature,
            coefficients: None,
        }
    }

    /// Fitted `(slope, intercept)`, if any.
    #[must_use]
    pub const fn coefficients(&self) -> Option<(f64, f64)> {
        self.coefficients
    }

    fn column(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        x.iter()
            .enumerate()
            .map(|(row, values)| {
                values.get(self.feature).copied().ok_or_else(|| {
                    Error::Estimator(format!(
                        "row {row} has no feature column {}",
                        self.feature
                    ))
                })
            })
            .collect()
    }
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Estimator for LinearRegression {
    #[allow(clippy::cast_precision_loss)]
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        if y.is_empty() {
            return Err(Error::EmptyInput("LinearRegression needs at least one target".into()));
        }
        if x.len() != y.len() {
            return Err(Error::ShapeMismatch {
                features: x.len(),
                targets: y.len(),
            });
        }

        let xs = self.column(x)?;
        let n = y.len() as f64;
        let x_mean = xs.iter().sum::<f64>() / n;
        let y_mean = y.iter().sum::<f64>() / n;

        let (sxy, sxx) = xs.iter().zip(y).fold((0.0, 0.0), |(sxy, sxx), (xi, yi)| {
            let dx = xi - x_mean;
            (dx.mul_add(yi - y_mean, sxy), dx.mul_add(dx, sxx))
        });

        // Constant feature: no slope to learn, predict the mean
        let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
        self.coefficients = Some((slope, slope.mul_add(-x_mean, y_mean)));
        Ok(())
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        let (slope, intercept) = self
            .coefficients
            .ok_or_else(|| not_fitted("LinearRegression"))?;
        Ok(self
            .column(x)?
            .into_iter()
            .map(|xi| slope.mul_add(xi, intercept))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &[f64]) -> Vec<Vec<f64>> {
        values.iter().map(|&v| vec![v]).collect()
    }

    #[test]
    fn test_mean_regressor() {
        let mut model = MeanRegressor::new();
        model.fit(&rows(&[0.0, 0.0]), &[1.0, 3.0]).unwrap();
        assert_eq!(model.predict(&rows(&[5.0, 6.0, 7.0])).unwrap(), vec![2.0; 3]);
    }

    #[test]
    fn test_predict_before_fit_fails() {
        assert!(matches!(
            MeanRegressor::new().predict(&rows(&[1.0])),
            Err(Error::Estimator(_))
        ));
        assert!(MajorityClassifier::new().predict(&rows(&[1.0])).is_err());
        assert!(LinearRegression::new(0).predict(&rows(&[1.0])).is_err());
    }

    #[test]
    fn test_majority_classifier_tie_breaks_low() {
        let mut model = MajorityClassifier::new();
        model
            .fit(&rows(&[0.0; 4]), &[2.0, 1.0, 2.0, 1.0])
            .unwrap();
        assert_eq!(model.label(), Some(1.0));

        model.fit(&rows(&[0.0; 3]), &[2.0, 1.0, 2.0]).unwrap();
        assert_eq!(model.label(), Some(2.0));
    }

    #[test]
    fn test_linear_regression_recovers_line() {
        let x = rows(&[0.0, 1.0, 2.0, 3.0]);
        let y = [1.0, 3.0, 5.0, 7.0];

        let mut model = LinearRegression::new(0);
        model.fit(&x, &y).unwrap();
        let (slope, intercept) = model.coefficients().unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);

        let pred = model.predict(&rows(&[10.0])).unwrap();
        assert!((pred[0] - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_regression_constant_feature() {
        let mut model = LinearRegression::new(0);
        model.fit(&rows(&[1.0, 1.0]), &[2.0, 4.0]).unwrap();
        assert_eq!(model.coefficients(), Some((0.0, 3.0)));
    }

    #[test]
    fn test_linear_regression_missing_column() {
        let mut model = LinearRegression::new(2);
        assert!(matches!(
            model.fit(&rows(&[1.0, 2.0]), &[1.0, 2.0]),
            Err(Error::Estimator(_))
        ));
    }
}
