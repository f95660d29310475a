//! JSON scan report.

use std::path::Path;

use chrono::{DateTime, Utc};
use dqscan_core::{
    DqConfig, DqError, DqEvaluation, DqMetrics, FetchRequest, Result, redact_database_url,
};
use serde::{Deserialize, Serialize};

/// Serializable summary of one scan.
///
/// The source URL is stored redacted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Report generation time
    pub generated_at: DateTime<Utc>,
    /// Version of the tool that produced the report
    pub tool_version: String,
    /// Redacted connection string
    pub source: String,
    /// Scanned table
    pub table: String,
    /// Fetched columns
    pub columns: Vec<String>,
    /// Email column evaluated
    pub email_column: String,
    /// Duplicate-detection key (empty when disabled)
    pub key_columns: Vec<String>,
    /// Metrics snapshot
    pub metrics: DqMetrics,
    /// Share of rows with a usable email
    pub email_validity: f64,
    /// Share of rows that are first occurrences of their key
    pub key_uniqueness: f64,
    /// Rows flagged as missing or invalid email
    pub bad_email_rows: Vec<serde_json::Value>,
    /// Rows sharing a duplicated key; absent when no key was configured
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub duplicate_rows: Option<Vec<serde_json::Value>>,
}

impl ScanReport {
    /// Builds a report from a finished evaluation.
    pub fn new(
        connection_string: &str,
        request: &FetchRequest,
        config: &DqConfig,
        evaluation: &DqEvaluation,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            source: redact_database_url(connection_string),
            table: request.table.clone(),
            columns: request.columns.clone(),
            email_column: config.email_column.clone(),
            key_columns: config.key_columns.clone(),
            metrics: evaluation.metrics,
            email_validity: evaluation.metrics.email_validity(),
            key_uniqueness: evaluation.metrics.key_uniqueness(),
            bad_email_rows: evaluation.bad_email_rows.to_json_records(),
            duplicate_rows: evaluation
                .duplicate_rows
                .as_ref()
                .map(|rows| rows.to_json_records()),
        }
    }
}

/// Writes the report as pretty-printed JSON.
pub async fn save_report(report: &ScanReport, output_path: &Path) -> Result<()> {
    let json_data = serde_json::to_string_pretty(report).map_err(|e| DqError::Serialization {
        context: "Failed to serialize scan report".to_string(),
        source: e,
    })?;

    tokio::fs::write(output_path, json_data)
        .await
        .map_err(|e| DqError::Io {
            context: format!("Failed to write to {}", output_path.display()),
            source: e,
        })?;

    Ok(())
}
