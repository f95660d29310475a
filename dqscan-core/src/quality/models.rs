//! Data quality result models.

use serde::{Deserialize, Serialize};

use crate::models::Table;

/// Immutable metrics snapshot for one evaluation.
///
/// Serialized field names follow the report columns (`rows`,
/// `missing_or_invalid_email`, `dup_ids`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DqMetrics {
    /// Total rows in the clean table
    #[serde(rename = "rows")]
    pub row_count: u64,
    /// Rows whose email is null or fails the shape check
    #[serde(rename = "missing_or_invalid_email")]
    pub missing_or_invalid_email_count: u64,
    /// Rows beyond the first occurrence of each key tuple
    #[serde(rename = "dup_ids")]
    pub duplicate_row_count: u64,
}

impl DqMetrics {
    /// Creates a metrics snapshot.
    pub fn new(
        row_count: u64,
        missing_or_invalid_email_count: u64,
        duplicate_row_count: u64,
    ) -> Self {
        // Diagnostic for anomalous input that could indicate upstream issues
        if missing_or_invalid_email_count > row_count {
            tracing::warn!(
                "Quality metrics anomaly: missing_or_invalid_email ({}) exceeds rows ({})",
                missing_or_invalid_email_count,
                row_count
            );
        }

        Self {
            row_count,
            missing_or_invalid_email_count,
            duplicate_row_count,
        }
    }

    /// Share of rows with a usable email (1.0 for an empty table).
    pub fn email_validity(&self) -> f64 {
        if self.row_count == 0 {
            1.0
        } else {
            let good = self
                .row_count
                .saturating_sub(self.missing_or_invalid_email_count);
            good as f64 / self.row_count as f64
        }
    }

    /// Share of rows that are first occurrences of their key (1.0 for an
    /// empty table).
    pub fn key_uniqueness(&self) -> f64 {
        if self.row_count == 0 {
            1.0
        } else {
            let unique = self.row_count.saturating_sub(self.duplicate_row_count);
            unique as f64 / self.row_count as f64
        }
    }
}

/// Output of evaluating one clean table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DqEvaluation {
    /// Metrics snapshot
    pub metrics: DqMetrics,
    /// Bad-email classification, aligned with the clean table rows
    pub bad_email_mask: Vec<bool>,
    /// Rows classified as bad email, in table order
    pub bad_email_rows: Table,
    /// Duplicated key tuples with counts; `None` when no key was given
    pub duplicate_keys: Option<Table>,
    /// Full rows of duplicated keys ordered by key; `None` when no key was given
    pub duplicate_rows: Option<Table>,
}

/// Clean table plus its evaluation, as produced by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DqOutcome {
    /// Normalized table the evaluation was computed from
    pub clean: Table,
    /// Metrics and row sets over `clean`
    pub evaluation: DqEvaluation,
}
