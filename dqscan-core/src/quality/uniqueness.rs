//! Duplicate-key detection.
//!
//! Rows are grouped by the ordered key tuple. A group of `n` rows contributes
//! `n - 1` duplicates: the first occurrence is never counted against the
//! total. The duplicate row set is every row of a group with more than one
//! member, joined back to the full table and ordered by key.

use crate::error::TableError;
use crate::models::{Table, Value};

/// Result of duplicate detection under a non-empty key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateAnalysis {
    /// Σ (n - 1) over key groups with n > 1
    pub duplicate_row_count: u64,
    /// Key tuples occurring more than once, with their `count`
    pub duplicate_keys: Table,
    /// Full rows of duplicated keys, ordered by key ascending
    pub duplicate_rows: Table,
}

/// Detects duplicate keys in a clean table.
///
/// Returns `Ok(None)` when `key_columns` is empty: without a key there are
/// no duplicate semantics to apply.
///
/// Null key values group together, so rows sharing a null key are
/// duplicates of each other.
pub fn analyze_duplicates<S: AsRef<str>>(
    table: &Table,
    key_columns: &[S],
) -> Result<Option<DuplicateAnalysis>, TableError> {
    if key_columns.is_empty() {
        return Ok(None);
    }

    let grouped = table.group_by(key_columns)?;
    let counts = grouped.count()?;
    let count_index = counts.require_column(&grouped.count_column())?;

    let duplicate_keys = counts.filter(|row| matches!(row[count_index], Value::Int(n) if n > 1));

    let duplicate_row_count = duplicate_keys
        .rows()
        .iter()
        .map(|row| match row[count_index] {
            Value::Int(n) => u64::try_from(n.saturating_sub(1)).unwrap_or(0),
            _ => 0,
        })
        .sum();

    let duplicate_rows = table
        .semi_join(&duplicate_keys, key_columns)?
        .sort_by(key_columns)?;

    tracing::debug!(
        keys = ?key_columns.iter().map(AsRef::as_ref).collect::<Vec<&str>>(),
        duplicate_keys = duplicate_keys.len(),
        duplicate_row_count,
        "Duplicate detection finished"
    );

    Ok(Some(DuplicateAnalysis {
        duplicate_row_count,
        duplicate_keys,
        duplicate_rows,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: Vec<(Value, &str, &str)>) -> Table {
        Table::from_rows(
            ["id", "country", "email"],
            rows.into_iter()
                .map(|(id, country, email)| vec![id, Value::from(country), Value::from(email)])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_no_duplicates() {
        let t = table(vec![
            (Value::Int(1), "us", "a@x.io"),
            (Value::Int(2), "us", "b@x.io"),
            (Value::Int(3), "de", "c@x.io"),
        ]);

        let analysis = analyze_duplicates(&t, &["id"]).unwrap().unwrap();

        assert_eq!(analysis.duplicate_row_count, 0);
        assert!(analysis.duplicate_keys.is_empty());
        assert!(analysis.duplicate_rows.is_empty());
    }

    #[test]
    fn test_group_contributes_n_minus_one() {
        let t = table(vec![
            (Value::Int(1), "us", "a@x.io"),
            (Value::Int(1), "us", "a@x.io"),
            (Value::Int(1), "de", "z@x.io"),
            (Value::Int(2), "us", "b@x.io"),
            (Value::Int(2), "fr", "c@x.io"),
        ]);

        let analysis = analyze_duplicates(&t, &["id"]).unwrap().unwrap();

        // id=1 has 3 rows (2 extra), id=2 has 2 rows (1 extra)
        assert_eq!(analysis.duplicate_row_count, 3);
        assert_eq!(analysis.duplicate_keys.len(), 2);
        assert_eq!(analysis.duplicate_rows.len(), 5);
    }

    #[test]
    fn test_composite_key() {
        let t = table(vec![
            (Value::Int(1), "us", "a@x.io"),
            (Value::Int(1), "us", "b@x.io"),
            (Value::Int(1), "de", "c@x.io"),
        ]);

        let analysis = analyze_duplicates(&t, &["id", "country"]).unwrap().unwrap();

        assert_eq!(analysis.duplicate_row_count, 1);
        assert_eq!(analysis.duplicate_keys.columns(), &["id", "country", "count"]);
        assert_eq!(analysis.duplicate_rows.len(), 2);
        assert!(
            analysis
                .duplicate_rows
                .rows()
                .iter()
                .all(|row| row[1] == Value::from("us"))
        );
    }

    #[test]
    fn test_duplicate_rows_sorted_by_key() {
        let t = table(vec![
            (Value::Int(9), "us", "first9@x.io"),
            (Value::Int(3), "us", "first3@x.io"),
            (Value::Int(9), "us", "second9@x.io"),
            (Value::Int(5), "us", "only5@x.io"),
            (Value::Int(3), "us", "second3@x.io"),
        ]);

        let analysis = analyze_duplicates(&t, &["id"]).unwrap().unwrap();

        let emails: Vec<String> = analysis
            .duplicate_rows
            .column_values("email")
            .unwrap()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            emails,
            vec!["first3@x.io", "second3@x.io", "first9@x.io", "second9@x.io"]
        );
    }

    #[test]
    fn test_null_keys_group_together() {
        let t = table(vec![
            (Value::Null, "us", "a@x.io"),
            (Value::Null, "de", "b@x.io"),
            (Value::Int(1), "us", "c@x.io"),
        ]);

        let analysis = analyze_duplicates(&t, &["id"]).unwrap().unwrap();

        assert_eq!(analysis.duplicate_row_count, 1);
        assert_eq!(analysis.duplicate_rows.len(), 2);
    }

    #[test]
    fn test_key_column_named_count() {
        let t = Table::from_rows(
            ["id", "count"],
            vec![
                vec![Value::Int(1), Value::Int(7)],
                vec![Value::Int(2), Value::Int(7)],
                vec![Value::Int(3), Value::Int(8)],
            ],
        )
        .unwrap();

        let analysis = analyze_duplicates(&t, &["count"]).unwrap().unwrap();

        assert_eq!(analysis.duplicate_row_count, 1);
        assert_eq!(analysis.duplicate_keys.columns(), &["count", "count_1"]);
        assert_eq!(analysis.duplicate_keys.value(0, "count_1"), Some(&Value::Int(2)));
        assert_eq!(analysis.duplicate_rows.len(), 2);
    }

    #[test]
    fn test_empty_key_skips_detection() {
        let t = table(vec![
            (Value::Int(1), "us", "a@x.io"),
            (Value::Int(1), "us", "a@x.io"),
        ]);

        let keys: [&str; 0] = [];
        assert_eq!(analyze_duplicates(&t, &keys).unwrap(), None);
    }

    #[test]
    fn test_missing_key_column() {
        let t = table(vec![]);
        assert_eq!(
            analyze_duplicates(&t, &["region"]),
            Err(TableError::MissingColumn("region".to_string()))
        );
    }

    #[test]
    fn test_empty_table() {
        let t = table(vec![]);
        let analysis = analyze_duplicates(&t, &["id"]).unwrap().unwrap();

        assert_eq!(analysis.duplicate_row_count, 0);
        assert!(analysis.duplicate_rows.is_empty());
        assert_eq!(analysis.duplicate_rows.columns(), t.columns());
    }
}
