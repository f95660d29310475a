//! Evaluation parameters.
//!
//! [`DqConfig`] names the email column to validate and the ordered key
//! columns used for duplicate detection. An empty key list is valid and turns
//! duplicate detection off.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::DqError;

/// Default email column name.
pub const DEFAULT_EMAIL_COLUMN: &str = "email";

/// Default duplicate-detection key.
pub const DEFAULT_KEY_COLUMNS: &[&str] = &["id"];

/// Validation errors for evaluation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("email column name must not be blank")]
    BlankEmailColumn,
    #[error("key column at position {0} is blank")]
    BlankKeyColumn(usize),
    #[error("key column '{0}' is listed more than once")]
    RepeatedKeyColumn(String),
}

impl From<ConfigValidationError> for DqError {
    fn from(error: ConfigValidationError) -> Self {
        DqError::validation_config(error.to_string())
    }
}

/// Parses a comma-separated key list such as `id` or `id, country`.
///
/// Entries are trimmed and blank entries dropped, so `""` yields an empty
/// list (no duplicate detection).
pub fn parse_key_columns(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Checks a key list for blank or repeated names.
pub fn validate_key_columns<S: AsRef<str>>(keys: &[S]) -> Result<(), ConfigValidationError> {
    for (position, key) in keys.iter().enumerate() {
        let key = key.as_ref();
        if key.trim().is_empty() {
            return Err(ConfigValidationError::BlankKeyColumn(position));
        }
        if keys[..position].iter().any(|k| k.as_ref() == key) {
            return Err(ConfigValidationError::RepeatedKeyColumn(key.to_string()));
        }
    }
    Ok(())
}

/// Data quality evaluation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DqConfig {
    /// Column holding email addresses
    pub email_column: String,
    /// Ordered key columns for duplicate detection (empty disables it)
    pub key_columns: Vec<String>,
}

impl Default for DqConfig {
    fn default() -> Self {
        Self {
            email_column: DEFAULT_EMAIL_COLUMN.to_string(),
            key_columns: DEFAULT_KEY_COLUMNS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl DqConfig {
    /// Creates a config with defaults (`email`, key `id`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the email column.
    pub fn with_email_column(mut self, column: impl Into<String>) -> Self {
        self.email_column = column.into();
        self
    }

    /// Builder method to set the key columns.
    pub fn with_key_columns<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_columns = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method taking a comma-separated key list.
    pub fn with_key_list(self, list: &str) -> Self {
        self.with_key_columns(parse_key_columns(list))
    }

    /// Returns true when duplicate detection is enabled.
    pub fn dedup_enabled(&self) -> bool {
        !self.key_columns.is_empty()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.email_column.trim().is_empty() {
            return Err(ConfigValidationError::BlankEmailColumn);
        }
        validate_key_columns(self.key_columns.as_slice())
    }
}
