//! Quality analyzer facade.
//!
//! [`evaluate`] computes the metrics and row sets for a clean table;
//! [`QualityAnalyzer`] runs normalization and evaluation with a stored
//! [`DqConfig`].

use crate::Result;
use crate::error::Phase;
use crate::models::Table;
use crate::normalize::normalize;

use super::config::{DqConfig, validate_key_columns};
use super::email::bad_email_mask;
use super::models::{DqEvaluation, DqMetrics, DqOutcome};
use super::uniqueness::analyze_duplicates;

/// Evaluates a clean table.
///
/// All metrics are derived from the same borrowed snapshot: the bad-email
/// mask comes from one full scan, duplicates from one grouping pass.
/// Either every output is produced or an error is returned.
///
/// An empty table is not an error; all counts are zero.
///
/// # Errors
/// - [`crate::DqError::ValidationConfig`] for a blank or repeated key column
/// - [`crate::DqError::Schema`] tagged [`Phase::Evaluate`] if the email
///   column or a key column is absent
pub fn evaluate<S: AsRef<str>>(
    clean: &Table,
    email_column: &str,
    key_columns: &[S],
) -> Result<DqEvaluation> {
    validate_key_columns(key_columns)?;

    let mask = bad_email_mask(clean, email_column).map_err(|e| e.in_phase(Phase::Evaluate))?;
    let duplicates =
        analyze_duplicates(clean, key_columns).map_err(|e| e.in_phase(Phase::Evaluate))?;

    let row_count = clean.len() as u64;
    let bad_count = mask.iter().filter(|bad| **bad).count() as u64;
    let duplicate_count = duplicates.as_ref().map_or(0, |d| d.duplicate_row_count);

    let metrics = DqMetrics::new(row_count, bad_count, duplicate_count);
    let bad_email_rows = clean.filter_mask(&mask);

    let (duplicate_keys, duplicate_rows) = match duplicates {
        Some(d) => (Some(d.duplicate_keys), Some(d.duplicate_rows)),
        None => (None, None),
    };

    tracing::info!(
        rows = metrics.row_count,
        missing_or_invalid_email = metrics.missing_or_invalid_email_count,
        dup_ids = metrics.duplicate_row_count,
        "Evaluation completed"
    );

    Ok(DqEvaluation {
        metrics,
        bad_email_mask: mask,
        bad_email_rows,
        duplicate_keys,
        duplicate_rows,
    })
}

/// Quality analyzer holding the evaluation parameters.
///
/// # Example
///
/// ```rust
/// use dqscan_core::models::{Table, Value};
/// use dqscan_core::quality::{DqConfig, QualityAnalyzer};
///
/// let raw = Table::from_rows(
///     ["id", "email", "age"],
///     vec![
///         vec![Value::from("1"), Value::from("a@b.com"), Value::from("30")],
///         vec![Value::from("1"), Value::from(""), Value::from("x")],
///     ],
/// )
/// .unwrap();
///
/// let analyzer = QualityAnalyzer::new(DqConfig::default());
/// let outcome = analyzer.analyze(&raw).unwrap();
/// assert_eq!(outcome.evaluation.metrics.row_count, 2);
/// assert_eq!(outcome.evaluation.metrics.missing_or_invalid_email_count, 1);
/// assert_eq!(outcome.evaluation.metrics.duplicate_row_count, 1);
/// ```
#[derive(Debug, Clone)]
pub struct QualityAnalyzer {
    config: DqConfig,
}

impl QualityAnalyzer {
    /// Creates a new quality analyzer with the given configuration.
    pub fn new(config: DqConfig) -> Self {
        Self { config }
    }

    /// Creates a new quality analyzer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(DqConfig::default())
    }

    /// Returns a reference to the analyzer configuration.
    pub fn config(&self) -> &DqConfig {
        &self.config
    }

    /// Normalizes a raw table with the configured email column.
    pub fn normalize(&self, raw: &Table) -> Result<Table> {
        normalize(raw, &self.config.email_column)
    }

    /// Evaluates an already-clean table.
    pub fn evaluate(&self, clean: &Table) -> Result<DqEvaluation> {
        evaluate(
            clean,
            &self.config.email_column,
            self.config.key_columns.as_slice(),
        )
    }

    /// Normalizes then evaluates a raw table.
    ///
    /// The configuration is validated before any work is done.
    pub fn analyze(&self, raw: &Table) -> Result<DqOutcome> {
        self.config.validate()?;

        let clean = self.normalize(raw)?;
        let evaluation = self.evaluate(&clean)?;

        Ok(DqOutcome { clean, evaluation })
    }
}
