//! Run Tracker - cross-validate, log, and rank candidate models

use std::fmt;
use std::io::{self, Write};

use tracing::{debug, info, info_span, warn};

use super::history::History;
use super::run_record::RunRecord;
use crate::config::TrackerConfig;
use crate::estimator::Estimator;
use crate::model_selection::{CrossValidation, ModelEvaluator, Scorer};
use crate::{Error, Result};

/// Per-call options for [`RunTracker::report_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOptions {
    notes: String,
    cv: Option<usize>,
}

impl ReportOptions {
    /// Empty notes, tracker's default fold count.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach free-text notes to the logged record.
    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Override the number of folds.
    #[must_use]
    pub const fn cv(mut self, cv: usize) -> Self {
        self.cv = Some(cv);
        self
    }
}

/// Line printed after every `report`.
#[must_use]
pub fn format_average_score(mean: f64) -> String {
    format!("Average Score: {mean}")
}

/// Line printed by `print_accuracy`.
#[must_use]
pub fn format_accuracy(name: &str, accuracy: f64) -> String {
    format!("{name} has an average error of ${accuracy:.2}")
}

/// Destination of the lines printed by `report` and `print_accuracy`.
pub struct Output(Box<dyn Write + Send>);

impl Output {
    /// Wrap any writer.
    #[must_use]
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self(Box::new(writer))
    }

    fn line(&mut self, line: &str) -> Result<()> {
        writeln!(self.0, "{line}")?;
        self.0.flush()?;
        Ok(())
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new(io::stdout())
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Output(..)")
    }
}

/// Cross-validates models and keeps a leaderboard of their mean scores.
///
/// The scorer is fixed at construction. History lives only as long as the
/// tracker; mutation goes through `&mut self`, so sharing a tracker between
/// threads requires the caller to wrap it in a lock.
///
/// # Example
///
/// ```rust
/// use model_history::estimator::{LinearRegression, MeanRegressor};
/// use model_history::model_selection::Metric;
/// use model_history::RunTracker;
///
/// let x: Vec<Vec<f64>> = (0..20).map(|i| vec![f64::from(i)]).collect();
/// let y: Vec<f64> = (0..20).map(|i| 3.0 * f64::from(i) + 1.0).collect();
///
/// let mut tracker = RunTracker::new(Metric::NegMeanSquaredError);
/// tracker.report(&MeanRegressor::new(), &x, &y, "baseline")?;
/// tracker.report(&LinearRegression::new(0), &x, &y, "ols")?;
///
/// assert_eq!(tracker.history().best().unwrap().name(), "ols");
/// # Ok::<(), model_history::Error>(())
/// ```
#[derive(Debug)]
pub struct RunTracker<S, E = CrossValidation> {
    scorer: S,
    evaluator: E,
    config: TrackerConfig,
    history: History,
    output: Output,
}

impl<S: Scorer> RunTracker<S> {
    /// Create a tracker with default configuration (seed 45, 5 folds).
    #[must_use]
    pub fn new(scorer: S) -> Self {
        Self::builder(scorer).build()
    }

    /// Create a builder for a tracker with non-default settings.
    #[must_use]
    pub fn builder(scorer: S) -> RunTrackerBuilder<S> {
        RunTrackerBuilder::new(scorer)
    }
}

impl<S: Scorer, E: ModelEvaluator> RunTracker<S, E> {
    /// Get the scorer.
    pub const fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Get the configuration.
    pub const fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Seed used for fold shuffling.
    pub const fn random_state(&self) -> u64 {
        self.config.random_state
    }

    /// Get the history table, highest score first.
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Cross-validate `model` with default options and log the mean score.
    ///
    /// # Errors
    ///
    /// See [`RunTracker::report_with`].
    pub fn report<M: Estimator>(
        &mut self,
        model: &M,
        x: &[Vec<f64>],
        y: &[f64],
        name: &str,
    ) -> Result<Vec<f64>> {
        self.report_with(model, x, y, name, ReportOptions::default())
    }

    /// Cross-validate `model`, log the mean score under `name`, and print it.
    ///
    /// Returns the per-fold scores in fold order.
    ///
    /// # Errors
    ///
    /// Propagates evaluator failures unchanged: an invalid fold count for
    /// the sample count, mismatched `x`/`y` lengths, or a model or scorer
    /// failing on a fold. Also fails if the average line cannot be written.
    /// History is left untouched on error.
    pub fn report_with<M: Estimator>(
        &mut self,
        model: &M,
        x: &[Vec<f64>],
        y: &[f64],
        name: &str,
        options: ReportOptions,
    ) -> Result<Vec<f64>> {
        let cv = options.cv.unwrap_or(self.config.cv);
        let span = info_span!("report", name, cv, scorer = self.scorer.name());
        let _guard = span.enter();

        let folds = self.config.kfold(cv);
        let scores = self
            .evaluator
            .evaluate(model, x, y, &self.scorer, &folds)
            .map_err(|e| {
                warn!(error = %e, "cross-validation failed");
                e
            })?;

        if scores.is_empty() {
            return Err(Error::EmptyInput("evaluator returned no fold scores".into()));
        }
        debug!(?scores, "fold scores");

        #[allow(clippy::cast_precision_loss)]
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;

        let record = RunRecord::builder(name, mean)
            .notes(options.notes)
            .folds(scores.len())
            .build();

        self.output.line(&format_average_score(mean))?;
        self.insert(record);
        Ok(scores)
    }

    /// Log an externally computed score.
    pub fn log_report(&mut self, name: &str, score: f64, notes: &str) {
        self.insert(RunRecord::builder(name, score).notes(notes).build());
    }

    /// Print `<name> has an average error of $<accuracy>` to the output
    /// (stdout unless the builder set another writer).
    ///
    /// Unrelated to the history table.
    ///
    /// # Errors
    ///
    /// Returns error if the line cannot be written.
    pub fn print_accuracy(&mut self, name: &str, accuracy: f64) -> Result<()> {
        self.output.line(&format_accuracy(name, accuracy))
    }

    fn insert(&mut self, record: RunRecord) {
        let name = record.name().to_string();
        let score = record.score();
        let row = self.history.insert_and_resort(record);
        info!(name = %name, score, row, runs = self.history.len(), "run logged");
    }
}

/// Builder for `RunTracker`.
#[derive(Debug)]
pub struct RunTrackerBuilder<S, E = CrossValidation> {
    scorer: S,
    evaluator: E,
    config: TrackerConfig,
    output: Output,
}

impl<S: Scorer> RunTrackerBuilder<S> {
    /// Create a new builder with the default evaluator and configuration.
    #[must_use]
    pub fn new(scorer: S) -> Self {
        Self {
            scorer,
            evaluator: CrossValidation,
            config: TrackerConfig::default(),
            output: Output::default(),
        }
    }
}

impl<S: Scorer, E: ModelEvaluator> RunTrackerBuilder<S, E> {
    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the fold shuffling seed.
    #[must_use]
    pub fn random_state(mut self, random_state: u64) -> Self {
        self.config.random_state = random_state;
        self
    }

    /// Set the default fold count.
    #[must_use]
    pub fn cv(mut self, cv: usize) -> Self {
        self.config.cv = cv;
        self
    }

    /// Set the score column label.
    #[must_use]
    pub fn score_column(mut self, label: impl Into<String>) -> Self {
        self.config.score_column = label.into();
        self
    }

    /// Send printed lines to `writer` instead of stdout.
    #[must_use]
    pub fn output(mut self, writer: impl Write + Send + 'static) -> Self {
        self.output = Output::new(writer);
        self
    }

    /// Swap in a different evaluator.
    #[must_use]
    pub fn evaluator<E2: ModelEvaluator>(self, evaluator: E2) -> RunTrackerBuilder<S, E2> {
        RunTrackerBuilder {
            scorer: self.scorer,
            evaluator,
            config: self.config,
            output: self.output,
        }
    }

    /// Build the `RunTracker` with an empty history.
    #[must_use]
    pub fn build(self) -> RunTracker<S, E> {
        let history = History::new(self.config.score_column.clone());
        RunTracker {
            scorer: self.scorer,
            evaluator: self.evaluator,
            config: self.config,
            history,
            output: self.output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::MeanRegressor;
    use crate::model_selection::{KFold, Metric};
    use std::sync::{Arc, Mutex};

    /// Writer whose bytes stay readable after the tracker takes it.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Rejects every write.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Returns canned fold scores regardless of the data.
    struct FixedScores(Vec<f64>);

    impl ModelEvaluator for FixedScores {
        fn evaluate<M, S>(
            &self,
            _model: &M,
            _x: &[Vec<f64>],
            _y: &[f64],
            _scorer: &S,
            folds: &KFold,
        ) -> Result<Vec<f64>>
        where
            M: Estimator,
            S: Scorer + ?Sized,
        {
            Ok(self.0.iter().copied().cycle().take(folds.n_splits()).collect())
        }
    }

    #[test]
    fn test_new_tracker_is_empty() {
        let tracker = RunTracker::new(Metric::Accuracy);
        assert!(tracker.history().is_empty());
        assert_eq!(tracker.random_state(), 45);
        assert_eq!(tracker.history().columns(), ["Name", "Accuracy", "Notes"]);
    }

    #[test]
    fn test_report_logs_mean_of_fold_scores() {
        let mut tracker = RunTracker::builder(Metric::Accuracy)
            .evaluator(FixedScores(vec![0.5, 1.0]))
            .build();

        let scores = tracker
            .report_with(
                &MeanRegressor::new(),
                &[],
                &[],
                "stub",
                ReportOptions::new().notes("canned").cv(4),
            )
            .unwrap();

        assert_eq!(scores, vec![0.5, 1.0, 0.5, 1.0]);
        let record = tracker.history().best().unwrap();
        assert!((record.score() - 0.75).abs() < 1e-12);
        assert_eq!(record.notes(), "canned");
        assert_eq!(record.folds(), Some(4));
    }

    #[test]
    fn test_empty_fold_scores_rejected() {
        let mut tracker = RunTracker::builder(Metric::Accuracy)
            .evaluator(FixedScores(vec![]))
            .build();
        let result = tracker.report(&MeanRegressor::new(), &[], &[], "nothing");
        assert!(matches!(result, Err(Error::EmptyInput(_))));
        assert!(tracker.history().is_empty());
    }

    #[test]
    fn test_log_report_ordering() {
        let mut tracker = RunTracker::new(Metric::Accuracy);
        tracker.log_report("a", 0.5, "");
        tracker.log_report("b", 0.9, "best");
        tracker.log_report("c", 0.7, "");
        assert_eq!(tracker.history().scores(), vec![0.9, 0.7, 0.5]);
    }

    #[test]
    fn test_builder_settings() {
        let tracker = RunTracker::builder(Metric::R2)
            .random_state(7)
            .cv(3)
            .score_column("R2")
            .build();
        assert_eq!(tracker.random_state(), 7);
        assert_eq!(tracker.config().cv, 3);
        assert!(tracker.config().kfold(3).shuffle());
        assert_eq!(tracker.history().score_column(), "R2");
        assert_eq!(tracker.scorer().name(), "r2");
    }

    #[test]
    fn test_report_prints_average_line() {
        let buf = SharedBuf::default();
        let mut tracker = RunTracker::builder(Metric::Accuracy)
            .evaluator(FixedScores(vec![0.5, 1.0]))
            .output(buf.clone())
            .build();

        tracker
            .report_with(&MeanRegressor::new(), &[], &[], "stub", ReportOptions::new().cv(2))
            .unwrap();
        assert_eq!(buf.contents(), "Average Score: 0.75\n");
    }

    #[test]
    fn test_print_accuracy_writes_line() {
        let buf = SharedBuf::default();
        let mut tracker = RunTracker::builder(Metric::Accuracy)
            .output(buf.clone())
            .build();

        tracker.print_accuracy("ModelA", 123.456).unwrap();
        assert_eq!(buf.contents(), "ModelA has an average error of $123.46\n");
        assert!(tracker.history().is_empty());
    }

    #[test]
    fn test_failed_write_leaves_history_untouched() {
        let mut tracker = RunTracker::builder(Metric::Accuracy)
            .evaluator(FixedScores(vec![1.0]))
            .output(ClosedPipe)
            .build();

        let result = tracker.report(&MeanRegressor::new(), &[], &[], "stub");
        assert!(matches!(result, Err(Error::Io(_))));
        assert!(tracker.history().is_empty());
        assert!(matches!(
            tracker.print_accuracy("ModelA", 1.0),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(
            format_accuracy("ModelA", 123.456),
            "ModelA has an average error of $123.46"
        );
        assert_eq!(format_average_score(0.75), "Average Score: 0.75");
        assert_eq!(format_average_score(-2.0), "Average Score: -2");
    }
}
