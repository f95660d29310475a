//! Raw-to-clean table normalization.
//!
//! - `id` and `age` become integers when their text is one or more ASCII
//!   digits, otherwise null.
//! - The email column collapses blank values to null and is otherwise left
//!   untouched; validity is judged later by the metrics engine.
//! - Every other column passes through.

use crate::Result;
use crate::error::Phase;
use crate::models::{Table, Value};

/// Integer-coerced columns. Not configurable.
pub const INTEGER_COLUMNS: [&str; 2] = ["id", "age"];

/// Returns true if `text` is one or more ASCII digits and nothing else.
pub fn is_digit_string(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Coerces a raw value to an integer or null.
///
/// Integers already in the table are judged by their decimal text, so
/// negative values become null. Digit strings too large for `i64` also
/// become null.
pub fn coerce_integer(value: &Value) -> Value {
    match value {
        Value::Int(n) if *n >= 0 => Value::Int(*n),
        Value::Text(text) if is_digit_string(text) => {
            text.parse::<i64>().map_or(Value::Null, Value::Int)
        }
        _ => Value::Null,
    }
}

/// Returns true if the value is text that is empty once spaces are trimmed.
///
/// Only ASCII space (U+0020) is trimmed; tabs and other whitespace are kept
/// and left for the email predicate to reject.
pub fn is_blank(value: &Value) -> bool {
    matches!(value, Value::Text(text) if text.trim_matches(' ').is_empty())
}

/// Collapses a blank email to null.
pub fn collapse_blank(value: &Value) -> Value {
    if is_blank(value) {
        Value::Null
    } else {
        value.clone()
    }
}

/// Produces the clean table from a raw table.
///
/// The input is not modified. Normalizing an already-clean table returns an
/// equal table.
///
/// # Errors
/// Returns a [`crate::DqError::Schema`] tagged [`Phase::Normalize`] if `id`,
/// `age` or `email_column` is missing from the schema.
pub fn normalize(table: &Table, email_column: &str) -> Result<Table> {
    let id = table
        .require_column(INTEGER_COLUMNS[0])
        .map_err(|e| e.in_phase(Phase::Normalize))?;
    let age = table
        .require_column(INTEGER_COLUMNS[1])
        .map_err(|e| e.in_phase(Phase::Normalize))?;
    let email = table
        .require_column(email_column)
        .map_err(|e| e.in_phase(Phase::Normalize))?;

    let mut id_nulled: u64 = 0;
    let mut age_nulled: u64 = 0;
    let mut email_nulled: u64 = 0;

    let clean = table.map_rows(|row| {
        let mut out = row.clone();

        out[id] = coerce_integer(&row[id]);
        if out[id].is_null() && !row[id].is_null() {
            id_nulled += 1;
        }

        out[age] = coerce_integer(&row[age]);
        if out[age].is_null() && !row[age].is_null() {
            age_nulled += 1;
        }

        // `id` and `email` may name the same column; the email rule then
        // sees the coerced value.
        out[email] = collapse_blank(&out[email]);
        if out[email].is_null() && !row[email].is_null() {
            email_nulled += 1;
        }

        out
    });

    tracing::debug!(
        rows = clean.len(),
        id_nulled,
        age_nulled,
        email_nulled,
        "Normalized table"
    );

    Ok(clean)
}
