//! Missing-or-invalid email detection.
//!
//! A value is bad when it is null or does not have the minimal
//! `local@domain.tld` shape: runs of characters that are neither `@` nor
//! whitespace, around exactly one `@` and at least one `.` after it. This is
//! a shape check, not RFC 5322 validation.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::TableError;
use crate::models::{Table, Value};

/// Email shape pattern. Whitespace is pinned to the ASCII set
/// (space, tab, LF, VT, FF, CR) so Unicode spaces count as ordinary
/// characters.
pub const EMAIL_PATTERN: &str =
    r"^[^@ \t\n\x0B\x0C\r]+@[^@ \t\n\x0B\x0C\r]+\.[^@ \t\n\x0B\x0C\r]+$";

fn email_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("Invalid email pattern"))
}

/// Returns true if the text has the `local@domain.tld` shape.
///
/// The text is matched as-is; surrounding spaces make it invalid.
pub fn is_valid_email(text: &str) -> bool {
    email_regex().is_match(text)
}

/// Bad-email predicate over a single value.
///
/// Null is bad. Non-text values are judged by their textual form.
pub fn is_bad_email(value: &Value) -> bool {
    match value.as_text() {
        None => true,
        Some(text) => !is_valid_email(&text),
    }
}

/// Classifies every row of the table in one scan.
///
/// The mask is positionally aligned with the table rows.
pub fn bad_email_mask(table: &Table, email_column: &str) -> Result<Vec<bool>, TableError> {
    let index = table.require_column(email_column)?;
    Ok(table.rows().iter().map(|row| is_bad_email(&row[index])).collect())
}
