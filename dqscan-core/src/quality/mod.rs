//! Data quality evaluation.
//!
//! Computes, over one clean table snapshot:
//! - **Row count**
//! - **Missing or invalid email**: null or not `local@domain.tld` shaped
//! - **Duplicate keys**: rows beyond the first occurrence of each key tuple
//!
//! along with the bad-email and duplicate row sets for inspection.
//!
//! # Example
//! ```rust,ignore
//! use dqscan_core::quality::{DqConfig, QualityAnalyzer};
//!
//! let analyzer = QualityAnalyzer::new(DqConfig::new().with_key_list("id,country"));
//! let outcome = analyzer.analyze(&raw_table)?;
//! println!("dup_ids = {}", outcome.evaluation.metrics.duplicate_row_count);
//! ```

mod analyzer;
mod config;
mod email;
mod models;
mod uniqueness;

// Re-export public API
pub use analyzer::{QualityAnalyzer, evaluate};
pub use config::{
    ConfigValidationError, DEFAULT_EMAIL_COLUMN, DEFAULT_KEY_COLUMNS, DqConfig,
    parse_key_columns, validate_key_columns,
};
pub use email::{EMAIL_PATTERN, bad_email_mask, is_bad_email, is_valid_email};
pub use models::{DqEvaluation, DqMetrics, DqOutcome};
pub use uniqueness::{DuplicateAnalysis, analyze_duplicates};
