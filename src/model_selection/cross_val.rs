//! Cross-validated model evaluation

use tracing::{debug, trace};

use super::kfold::KFold;
use super::scorer::Scorer;
use crate::estimator::Estimator;
use crate::{Error, Result};

/// Runs k-fold cross-validation and returns one score per fold.
///
/// The tracker never inspects how scores are produced; tests substitute
/// deterministic implementations of this trait.
pub trait ModelEvaluator {
    /// Evaluate `model` on every fold of `folds`, in fold order.
    ///
    /// # Errors
    ///
    /// Returns error if the inputs are malformed, the fold count is invalid
    /// for the sample count, or the model or scorer fails on any fold.
    fn evaluate<M, S>(
        &self,
        model: &M,
        x: &[Vec<f64>],
        y: &[f64],
        scorer: &S,
        folds: &KFold,
    ) -> Result<Vec<f64>>
    where
        M: Estimator,
        S: Scorer + ?Sized;
}

/// Default evaluator: clone, fit on the training folds, score the held-out fold.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossValidation;

impl ModelEvaluator for CrossValidation {
    fn evaluate<M, S>(
        &self,
        model: &M,
        x: &[Vec<f64>],
        y: &[f64],
        scorer: &S,
        folds: &KFold,
    ) -> Result<Vec<f64>>
    where
        M: Estimator,
        S: Scorer + ?Sized,
    {
        check_features(x, y)?;
        let splits = folds.split(y.len())?;

        let mut scores = Vec::with_capacity(splits.len());
        for (i, fold) in splits.iter().enumerate() {
            let (x_train, y_train) = gather(x, y, &fold.train);
            let (x_test, y_test) = gather(x, y, &fold.test);

            let mut fold_model = model.clone();
            fold_model.fit(&x_train, &y_train)?;
            let y_pred = fold_model.predict(&x_test)?;
            let score = scorer.score(&y_test, &y_pred)?;

            trace!(fold = i, train = fold.train.len(), test = fold.test.len(), score);
            scores.push(score);
        }

        debug!(scorer = scorer.name(), folds = scores.len(), "cross-validation finished");
        Ok(scores)
    }
}

/// Cross-validate `model` with the default [`CrossValidation`] evaluator.
///
/// # Errors
///
/// See [`ModelEvaluator::evaluate`].
///
/// # Example
///
/// ```rust
/// use model_history::estimator::MeanRegressor;
/// use model_history::model_selection::{cross_val_score, KFold, Metric};
///
/// let x: Vec<Vec<f64>> = (0..10).map(|i| vec![f64::from(i)]).collect();
/// let y: Vec<f64> = (0..10).map(f64::from).collect();
///
/// let scores = cross_val_score(&MeanRegressor::new(), &x, &y, &Metric::NegMeanAbsoluteError, &KFold::new(5))?;
/// assert_eq!(scores.len(), 5);
/// # Ok::<(), model_history::Error>(())
/// ```
pub fn cross_val_score<M, S>(
    model: &M,
    x: &[Vec<f64>],
    y: &[f64],
    scorer: &S,
    folds: &KFold,
) -> Result<Vec<f64>>
where
    M: Estimator,
    S: Scorer + ?Sized,
{
    CrossValidation.evaluate(model, x, y, scorer, folds)
}

fn check_features(x: &[Vec<f64>], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(Error::ShapeMismatch {
            features: x.len(),
            targets: y.len(),
        });
    }

    if let Some(first) = x.first() {
        let expected = first.len();
        if let Some((row, values)) = x.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(Error::RaggedFeatures {
                row,
                expected,
                got: values.len(),
            });
        }
    }
    Ok(())
}

fn gather(x: &[Vec<f64>], y: &[f64], indices: &[usize]) -> (Vec<Vec<f64>>, Vec<f64>) {
    indices.iter().map(|&i| (x[i].clone(), y[i])).unzip()
}
