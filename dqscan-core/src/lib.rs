//! Core library for dqscan.
//!
//! A data-quality pass over one tabular dataset:
//! - [`normalize`] coerces `id`/`age` to integers and collapses blank emails
//!   to null, producing the clean table.
//! - [`evaluate`] computes row count, missing-or-invalid email count and
//!   duplicate-key count over the clean table, along with the offending
//!   rows.
//! - [`source`] delivers the raw table from SQLite, a Postgres-wire store or
//!   memory.
//!
//! # Guarantees
//! - Inputs are never mutated; every stage returns a new table
//! - Metrics are computed from one snapshot and are all-or-nothing
//! - Connection strings are redacted before they reach logs or errors
//!
//! # Example
//! ```rust
//! use dqscan_core::{QualityAnalyzer, Table, Value};
//!
//! let raw = Table::from_rows(
//!     ["id", "email", "age"],
//!     vec![
//!         vec![Value::from("1"), Value::from("a@b.com"), Value::from("30")],
//!         vec![Value::from("2"), Value::from(" "), Value::from("n/a")],
//!     ],
//! )
//! .unwrap();
//!
//! let outcome = QualityAnalyzer::with_defaults().analyze(&raw).unwrap();
//! assert_eq!(outcome.evaluation.metrics.missing_or_invalid_email_count, 1);
//! assert_eq!(outcome.clean.value(1, "age"), Some(&Value::Null));
//! ```

pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod quality;
pub mod source;

// Re-export commonly used types
pub use error::{DqError, Phase, Result, redact_database_url};
pub use logging::init_logging;
pub use models::{KeyTuple, Row, Table, Value};
pub use normalize::normalize;
pub use quality::{DqConfig, DqEvaluation, DqMetrics, DqOutcome, QualityAnalyzer, evaluate};
pub use source::{DataSource, FetchRequest, SourceConfig, SourceType, create_source};
