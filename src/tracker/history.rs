//! History table: run records kept sorted by score, highest first
//!
//! The table is append-then-resort. Before every sort the rows are relabelled
//! `0..n` in their current order (the new record taking `n - 1`), and each
//! label then travels with its row through the sort. Labels therefore always
//! cover `0..n` but are not in display order.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use super::run_record::RunRecord;
use crate::config::DEFAULT_SCORE_COLUMN;
use crate::Result;

/// Name column label
pub const NAME_COLUMN: &str = "Name";

/// Notes column label
pub const NOTES_COLUMN: &str = "Notes";

/// Descending score order with NaN scores sunk to the bottom.
///
/// Total over all `f64`, so stable sorting keeps the insertion order of ties.
#[must_use]
pub fn descending_score(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Ordered table of run records.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    records: Vec<RunRecord>,
    labels: Vec<usize>,
    score_column: String,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_SCORE_COLUMN)
    }
}

impl History {
    /// Create an empty history whose score column carries `score_column`.
    #[must_use]
    pub fn new(score_column: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            labels: Vec::new(),
            score_column: score_column.into(),
        }
    }

    /// Column labels in display order.
    #[must_use]
    pub fn columns(&self) -> [&str; 3] {
        [NAME_COLUMN, &self.score_column, NOTES_COLUMN]
    }

    /// Label of the score column.
    #[must_use]
    pub fn score_column(&self) -> &str {
        &self.score_column
    }

    /// Append `record`, relabel rows `0..n` in current order, and re-sort
    /// the table by score, highest first.
    ///
    /// Returns the position the record landed on. Among equal scores the
    /// new record goes after the existing ones.
    pub fn insert_and_resort(&mut self, record: RunRecord) -> usize {
        self.records.push(record);
        let new_label = self.records.len() - 1;

        let mut rows: Vec<(usize, RunRecord)> =
            std::mem::take(&mut self.records).into_iter().enumerate().collect();
        rows.sort_by(|a, b| descending_score(a.1.score(), b.1.score()));
        (self.labels, self.records) = rows.into_iter().unzip();

        self.labels
            .iter()
            .position(|&label| label == new_label)
            .unwrap_or(new_label)
    }

    /// Row labels in display order, assigned at the last relabelling.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record was logged yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, highest score first.
    #[must_use]
    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    /// Iterate records, highest score first.
    pub fn iter(&self) -> std::slice::Iter<'_, RunRecord> {
        self.records.iter()
    }

    /// Record at sorted position `row`.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&RunRecord> {
        self.records.get(row)
    }

    /// Highest scoring record.
    #[must_use]
    pub fn best(&self) -> Option<&RunRecord> {
        self.records.first()
    }

    /// The `k` highest scoring records (fewer if the table is shorter).
    #[must_use]
    pub fn top(&self, k: usize) -> &[RunRecord] {
        &self.records[..k.min(self.records.len())]
    }

    /// Scores in row order.
    #[must_use]
    pub fn scores(&self) -> Vec<f64> {
        self.records.iter().map(RunRecord::score).collect()
    }

    /// Export as an Arrow record batch with columns `Name`, the score
    /// column, and `Notes`.
    ///
    /// # Errors
    ///
    /// Returns error if Arrow rejects the batch.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let schema = Arc::new(Schema::new(vec![
            Field::new(NAME_COLUMN, DataType::Utf8, false),
            Field::new(self.score_column.as_str(), DataType::Float64, false),
            Field::new(NOTES_COLUMN, DataType::Utf8, false),
        ]));

        let names: ArrayRef = Arc::new(StringArray::from(
            self.records.iter().map(RunRecord::name).collect::<Vec<_>>(),
        ));
        let scores: ArrayRef = Arc::new(Float64Array::from(self.scores()));
        let notes: ArrayRef = Arc::new(StringArray::from(
            self.records.iter().map(RunRecord::notes).collect::<Vec<_>>(),
        ));

        Ok(RecordBatch::try_new(schema, vec![names, scores, notes])?)
    }

    /// Serialize the records as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    /// Export as markdown table
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut md = format!(
            "| Row | {NAME_COLUMN} | {} | {NOTES_COLUMN} |\n|-----|------|------|-------|\n",
            self.score_column
        );
        for (row, record) in self.labels.iter().zip(&self.records) {
            md.push_str(&format!(
                "| {row} | {} | {:.4} | {} |\n",
                escape_markdown(record.name()),
                record.score(),
                escape_markdown(record.notes()),
            ));
        }
        md
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a RunRecord;
    type IntoIter = std::slice::Iter<'a, RunRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn escape_markdown(cell: &str) -> String {
    cell.replace('|', "\\|")
}

/// Renders like a dataframe: the row label column, then `Name`, score, `Notes`.
impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.records.is_empty() {
            let [name, score, notes] = self.columns();
            return write!(f, "Empty history\nColumns: [{name}, {score}, {notes}]");
        }

        let scores: Vec<String> = self
            .records
            .iter()
            .map(|r| format!("{:.6}", r.score()))
            .collect();

        let index_w = (self.records.len() - 1).to_string().len();
        let name_w = self
            .records
            .iter()
            .map(|r| r.name().chars().count())
            .chain([NAME_COLUMN.len()])
            .max()
            .unwrap_or(0);
        let score_w = scores
            .iter()
            .map(String::len)
            .chain([self.score_column.chars().count()])
            .max()
            .unwrap_or(0);

        let header = format!(
            "{:>index_w$}  {NAME_COLUMN:<name_w$}  {:>score_w$}  {NOTES_COLUMN}",
            "", self.score_column
        );
        write!(f, "{}", header.trim_end())?;

        for ((row, record), score) in self.labels.iter().zip(&self.records).zip(&scores) {
            let line = format!(
                "{row:>index_w$}  {:<name_w$}  {score:>score_w$}  {}",
                record.name(),
                record.notes()
            );
            write!(f, "\n{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;

    fn history_of(scores: &[f64]) -> History {
        let mut history = History::default();
        for (i, &score) in scores.iter().enumerate() {
            history.insert_and_resort(RunRecord::new(format!("m{i}"), score));
        }
        history
    }

    #[test]
    fn test_sorted_descending() {
        let history = history_of(&[0.9, 0.5, 0.7]);
        assert_eq!(history.scores(), vec![0.9, 0.7, 0.5]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let history = history_of(&[0.5, 0.8, 0.5, 0.5]);
        let names: Vec<&str> = history.iter().map(RunRecord::name).collect();
        assert_eq!(names, vec!["m1", "m0", "m2", "m3"]);
    }

    #[test]
    fn test_labels_travel_with_rows() {
        let history = history_of(&[0.9, 0.5, 0.7]);
        assert_eq!(history.labels(), &[0, 2, 1]);

        // Relabelled 0..n in sorted order before the next sort
        let mut history = history;
        history.insert_and_resort(RunRecord::new("m3", 0.8));
        assert_eq!(history.scores(), vec![0.9, 0.8, 0.7, 0.5]);
        assert_eq!(history.labels(), &[0, 3, 1, 2]);
    }

    #[test]
    fn test_insert_returns_landing_row() {
        let mut history = history_of(&[0.9, 0.5]);
        let row = history.insert_and_resort(RunRecord::new("new", 0.7));
        assert_eq!(row, 1);
        assert_eq!(history.get(row).unwrap().name(), "new");

        let row = history.insert_and_resort(RunRecord::new("tie", 0.9));
        assert_eq!(row, 1);
        assert_eq!(history.get(row).unwrap().name(), "tie");
    }

    #[test]
    fn test_nan_sinks_to_bottom() {
        let mut history = history_of(&[0.1, f64::NAN, -4.0]);
        assert_eq!(history.get(0).unwrap().score(), 0.1);
        assert!(history.get(2).unwrap().score().is_nan());

        let row = history.insert_and_resort(RunRecord::new("nan2", f64::NAN));
        assert_eq!(row, 3);
    }

    #[test]
    fn test_best_and_top() {
        let history = history_of(&[0.2, 0.6, 0.4]);
        assert_eq!(history.best().unwrap().name(), "m1");
        assert_eq!(history.top(2).len(), 2);
        assert_eq!(history.top(10).len(), 3);
        assert!(History::default().best().is_none());
    }

    #[test]
    fn test_record_batch_export() {
        let history = history_of(&[0.3, 0.9]);
        let batch = history.to_record_batch().unwrap();

        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.schema().field(0).name(), "Name");
        assert_eq!(batch.schema().field(1).name(), "Accuracy");
        assert_eq!(batch.schema().field(2).name(), "Notes");

        let scores = batch
            .column(1)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores.value(0), 0.9);
    }

    #[test]
    fn test_custom_score_column() {
        let history = History::new("neg_mse");
        assert_eq!(history.columns(), ["Name", "neg_mse", "Notes"]);
        let batch = history.to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.schema().field(1).name(), "neg_mse");
    }

    #[test]
    fn test_display() {
        let mut history = History::default();
        history.insert_and_resort(RunRecord::builder("ridge", 0.5).notes("alpha=1").build());
        history.insert_and_resort(RunRecord::new("ols", 0.75));

        let expected = "   Name   Accuracy  Notes\n1  ols    0.750000\n0  ridge  0.500000  alpha=1";
        assert_eq!(history.to_string(), expected);
    }

    #[test]
    fn test_display_empty() {
        assert_eq!(
            History::default().to_string(),
            "Empty history\nColumns: [Name, Accuracy, Notes]"
        );
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        let mut history = History::default();
        history.insert_and_resort(RunRecord::builder("a|b", 1.0).notes("x|y").build());
        let md = history.to_markdown();
        assert!(md.starts_with("| Row | Name | Accuracy | Notes |"));
        assert!(md.contains("| 0 | a\\|b | 1.0000 | x\\|y |"));
    }

    #[test]
    fn test_json_export() {
        let history = history_of(&[0.25]);
        let json = history.to_json().unwrap();
        let parsed: Vec<RunRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, history.records());
    }
}
