//! Console rendering of tables and scan results.
//!
//! Tables are drawn as a `+---+` grid with left-aligned cells and `null`
//! for missing values. Only the first rows are shown, followed by an
//! `only showing top N rows` footer when rows were cut.

use std::fmt::Write;

use dqscan_core::{DqMetrics, DqOutcome, Table};

/// Rows shown per table unless overridden.
pub const DEFAULT_SHOW_ROWS: usize = 20;

const MIN_COLUMN_WIDTH: usize = 3;

/// Renders a header row plus cells as a text grid.
///
/// `total_rows` may exceed `rows.len()` when the caller already cut the
/// rows; the footer reports the cut.
pub fn format_grid(headers: &[String], rows: &[Vec<String>], total_rows: usize) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .map(|h| h.chars().count().max(MIN_COLUMN_WIDTH))
        .collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = widths.iter().fold(String::from("+"), |mut line, width| {
        line.push_str(&"-".repeat(*width));
        line.push('+');
        line
    });

    let mut out = String::new();
    out.push_str(&separator);
    out.push('\n');
    out.push_str(&format_line(headers, &widths));
    out.push_str(&separator);
    out.push('\n');
    for row in rows {
        out.push_str(&format_line(row, &widths));
    }
    out.push_str(&separator);
    out.push('\n');

    if total_rows > rows.len() {
        let noun = if rows.len() == 1 { "row" } else { "rows" };
        let _ = writeln!(out, "only showing top {} {}", rows.len(), noun);
    }

    out
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        let padding = width.saturating_sub(cell.chars().count());
        line.push_str(cell);
        line.push_str(&" ".repeat(padding));
        line.push('|');
    }
    line.push('\n');
    line
}

/// Renders the first `limit` rows of a table.
pub fn format_table(table: &Table, limit: usize) -> String {
    let rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .take(limit)
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();
    format_grid(table.columns(), &rows, table.len())
}

/// Renders the metrics as a one-row table.
pub fn format_metrics(metrics: &DqMetrics) -> String {
    let headers = ["rows", "missing_or_invalid_email", "dup_ids"].map(String::from);
    let row = vec![
        metrics.row_count.to_string(),
        metrics.missing_or_invalid_email_count.to_string(),
        metrics.duplicate_row_count.to_string(),
    ];
    format_grid(&headers, &[row], 1)
}

/// Renders every section of a scan.
///
/// The duplicate section is omitted when no key was configured.
pub fn format_outcome(outcome: &DqOutcome, limit: usize) -> String {
    let evaluation = &outcome.evaluation;
    let mut out = String::new();

    out.push_str("=== Cleaned sample ===\n");
    out.push_str(&format_table(&outcome.clean, limit));
    out.push('\n');

    out.push_str("=== DQ summary ===\n");
    out.push_str(&format_metrics(&evaluation.metrics));
    out.push('\n');

    out.push_str("=== Bad email rows ===\n");
    out.push_str(&format_table(&evaluation.bad_email_rows, limit));

    if let Some(duplicates) = &evaluation.duplicate_rows {
        out.push('\n');
        out.push_str("=== Duplicate id rows ===\n");
        out.push_str(&format_table(duplicates, limit));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqscan_core::Value;

    #[test]
    fn test_format_table_pads_and_shows_null() {
        let table = Table::from_rows(
            ["id", "email"],
            vec![
                vec![Value::Int(1), Value::from("a@b.com")],
                vec![Value::Int(22), Value::Null],
            ],
        )
        .unwrap();

        let expected = "\
+---+-------+
|id |email  |
+---+-------+
|1  |a@b.com|
|22 |null   |
+---+-------+
";
        assert_eq!(format_table(&table, 20), expected);
    }

    #[test]
    fn test_format_table_truncation_footer() {
        let rows = (0..5).map(|i| vec![Value::Int(i)]).collect();
        let table = Table::from_rows(["id"], rows).unwrap();

        let rendered = format_table(&table, 2);
        assert!(rendered.ends_with("only showing top 2 rows\n"));
        assert_eq!(rendered.lines().count(), 7);
    }

    #[test]
    fn test_format_empty_table() {
        let table = Table::new(["id", "country"]).unwrap();
        let expected = "\
+---+-------+
|id |country|
+---+-------+
+---+-------+
";
        assert_eq!(format_table(&table, 20), expected);
    }

    #[test]
    fn test_format_metrics() {
        let rendered = format_metrics(&DqMetrics::new(3, 1, 1));
        assert!(rendered.contains("|rows|missing_or_invalid_email|dup_ids|"));
        assert!(rendered.contains("|3   |1                       |1      |"));
    }
}
