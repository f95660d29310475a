//! Tabular data model shared by the source adapters, the normalizer and the
//! metrics engine.
//!
//! A [`Table`] is an ordered column schema plus rows of [`Value`]s. Every row
//! carries exactly one value per schema column; the constructors enforce this
//! so downstream code can index rows by column position without checks.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// A single cell value.
///
/// Ordering is `Null < Int < Text`, ints numerically and text
/// lexicographically. Two nulls compare equal, so null keys group together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing or invalid value
    Null,
    /// Integer value
    Int(i64),
    /// Text value, passed through as received
    Text(String),
}

impl Value {
    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the textual form of a non-null value.
    ///
    /// Integers are rendered in decimal, text is borrowed as-is.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Null => None,
            Value::Int(n) => Some(Cow::Owned(n.to_string())),
            Value::Text(s) => Some(Cow::Borrowed(s.as_str())),
        }
    }

    /// Converts a JSON value as returned by a source into a raw cell value.
    ///
    /// Integral numbers become [`Value::Int`]; every other non-null scalar or
    /// nested value is kept in its textual form.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Text(n.to_string()),
            },
            serde_json::Value::Bool(b) => Value::Text(b.to_string()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Value::Text(value.to_string())
            }
        }
    }

    /// Converts the value into JSON for reports.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Int(n) => serde_json::Value::from(*n),
            Value::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// One record, positionally aligned with its table's column schema.
pub type Row = Vec<Value>;

/// Ordered values drawn from a row's key columns.
pub type KeyTuple = Vec<Value>;

/// A column schema plus rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table with the given column schema.
    ///
    /// # Errors
    /// Returns [`TableError::DuplicateColumn`] if a name repeats.
    pub fn new<I, S>(columns: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for column in columns {
            let column = column.into();
            if names.contains(&column) {
                return Err(TableError::DuplicateColumn(column));
            }
            names.push(column);
        }

        Ok(Self {
            columns: names,
            rows: Vec::new(),
        })
    }

    /// Creates a table from a schema and rows, validating row widths.
    pub fn from_rows<I, S>(columns: I, rows: Vec<Row>) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns)?;
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Creates a table from JSON objects, reading the given columns in order.
    ///
    /// Keys absent from an object become [`Value::Null`]; extra keys are
    /// ignored. Non-object records are rejected as width mismatches.
    pub fn from_json_records<I, S>(
        columns: I,
        records: &[serde_json::Value],
    ) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns)?;
        for (index, record) in records.iter().enumerate() {
            let object = record.as_object().ok_or(TableError::RowWidth {
                row: index,
                expected: table.columns.len(),
                found: 0,
            })?;
            let row = table
                .columns
                .iter()
                .map(|column| object.get(column).map_or(Value::Null, Value::from_json))
                .collect();
            table.rows.push(row);
        }
        Ok(table)
    }

    /// Appends a row, checking it against the schema width.
    pub fn push_row(&mut self, row: Row) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names in schema order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in table order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column in the schema.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of a column, or [`TableError::MissingColumn`].
    pub fn require_column(&self, name: &str) -> Result<usize, TableError> {
        self.column_index(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// Value at a row and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// All values of one column in row order.
    pub fn column_values(&self, name: &str) -> Result<Vec<&Value>, TableError> {
        let index = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| &row[index]).collect())
    }

    /// Builds a table sharing this schema from already-validated rows.
    pub(crate) fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Rows rendered as JSON objects keyed by column name.
    pub fn to_json_records(&self) -> Vec<serde_json::Value> {
        self.rows
            .iter()
            .map(|row| {
                let object: serde_json::Map<String, serde_json::Value> = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.iter().map(Value::to_json))
                    .collect();
                serde_json::Value::Object(object)
            })
            .collect()
    }
}
