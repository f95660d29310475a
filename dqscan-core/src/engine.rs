//! Relational primitives over [`Table`].
//!
//! The normalizer and the metrics engine are written against these
//! operations only (projection, filter, group-by/count, inner join on keys,
//! order-by), so they do not care how the primitives are executed. This
//! implementation runs them in-process over a materialized table.

use std::collections::{BTreeMap, HashSet};

use crate::error::TableError;
use crate::models::{KeyTuple, Row, Table, Value};

/// Preferred name of the count column produced by [`GroupedTable::count`].
pub const COUNT_COLUMN: &str = "count";

/// Rows of a table grouped by an ordered key tuple.
///
/// Groups are kept in ascending key order; row indices inside a group keep
/// table order, so the first index is the first occurrence of the key.
#[derive(Debug, Clone)]
pub struct GroupedTable<'a> {
    table: &'a Table,
    key_columns: Vec<String>,
    groups: BTreeMap<KeyTuple, Vec<usize>>,
}

impl<'a> GroupedTable<'a> {
    /// Key column names in grouping order.
    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    /// Number of distinct key tuples.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Iterates over groups in ascending key order.
    pub fn groups(&self) -> impl Iterator<Item = (&KeyTuple, &[usize])> {
        self.groups.iter().map(|(key, rows)| (key, rows.as_slice()))
    }

    /// The source table.
    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// Name of the count column in [`GroupedTable::count`].
    ///
    /// `count`, or `count_1`, `count_2`, ... when a key column already uses
    /// that name.
    pub fn count_column(&self) -> String {
        let mut name = COUNT_COLUMN.to_string();
        let mut suffix = 0;
        while self.key_columns.contains(&name) {
            suffix += 1;
            name = format!("{}_{}", COUNT_COLUMN, suffix);
        }
        name
    }

    /// Collapses groups into a table of key columns plus a count column.
    pub fn count(&self) -> Result<Table, TableError> {
        let mut columns = self.key_columns.clone();
        columns.push(self.count_column());

        let rows = self
            .groups
            .iter()
            .map(|(key, indices)| {
                let mut row = key.clone();
                row.push(Value::Int(i64::try_from(indices.len()).unwrap_or(i64::MAX)));
                row
            })
            .collect();

        Table::from_rows(columns, rows)
    }
}

impl Table {
    /// Resolves column names to schema positions.
    pub fn resolve_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>, TableError> {
        names
            .iter()
            .map(|name| self.require_column(name.as_ref()))
            .collect()
    }

    /// Key tuple of one row for the given column positions.
    pub fn key_of(row: &[Value], indices: &[usize]) -> KeyTuple {
        indices.iter().map(|&i| row[i].clone()).collect()
    }

    /// Projects the table onto the given columns, in the given order.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Result<Table, TableError> {
        let indices = self.resolve_columns(columns)?;
        let rows = self
            .rows()
            .iter()
            .map(|row| Self::key_of(row, &indices))
            .collect();
        Table::from_rows(columns.iter().map(|c| c.as_ref().to_string()), rows)
    }

    /// Keeps rows for which the predicate holds.
    pub fn filter<F>(&self, mut predicate: F) -> Table
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows()
            .iter()
            .filter(|row| predicate(row))
            .cloned()
            .collect();
        self.with_rows(rows)
    }

    /// Keeps rows whose position in `mask` is true.
    ///
    /// Rows beyond the end of the mask are dropped.
    pub fn filter_mask(&self, mask: &[bool]) -> Table {
        let rows = self
            .rows()
            .iter()
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|(row, _)| row.clone())
            .collect();
        self.with_rows(rows)
    }

    /// Returns a new table with `f` applied to every row.
    ///
    /// The closure must preserve row width; the schema is unchanged.
    pub fn map_rows<F>(&self, f: F) -> Table
    where
        F: FnMut(&Row) -> Row,
    {
        let rows: Vec<Row> = self.rows().iter().map(f).collect();
        debug_assert!(rows.iter().all(|r| r.len() == self.columns().len()));
        self.with_rows(rows)
    }

    /// Groups rows by the ordered key columns.
    pub fn group_by<S: AsRef<str>>(&self, keys: &[S]) -> Result<GroupedTable<'_>, TableError> {
        let indices = self.resolve_columns(keys)?;
        let mut groups: BTreeMap<KeyTuple, Vec<usize>> = BTreeMap::new();

        for (position, row) in self.rows().iter().enumerate() {
            groups
                .entry(Self::key_of(row, &indices))
                .or_default()
                .push(position);
        }

        Ok(GroupedTable {
            table: self,
            key_columns: keys.iter().map(|k| k.as_ref().to_string()).collect(),
            groups,
        })
    }

    /// Inner join against a key table, keeping only this table's columns.
    ///
    /// `other` must contain every `on` column; its remaining columns are not
    /// carried over. Key equality treats nulls as equal.
    pub fn semi_join<S: AsRef<str>>(&self, other: &Table, on: &[S]) -> Result<Table, TableError> {
        let left = self.resolve_columns(on)?;
        let right = other.resolve_columns(on)?;

        let wanted: HashSet<KeyTuple> = other
            .rows()
            .iter()
            .map(|row| Self::key_of(row, &right))
            .collect();

        Ok(self.filter(|row| wanted.contains(&Self::key_of(row, &left))))
    }

    /// Stable sort by the given columns ascending.
    pub fn sort_by<S: AsRef<str>>(&self, columns: &[S]) -> Result<Table, TableError> {
        let indices = self.resolve_columns(columns)?;
        let mut rows = self.rows().to_vec();
        rows.sort_by(|a, b| {
            indices
                .iter()
                .map(|&i| a[i].cmp(&b[i]))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(self.with_rows(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customers() -> Table {
        Table::from_rows(
            ["id", "country", "email"],
            vec![
                vec![Value::Int(2), Value::from("us"), Value::from("b@x.io")],
                vec![Value::Int(1), Value::from("de"), Value::from("a@x.io")],
                vec![Value::Int(2), Value::from("us"), Value::from("c@x.io")],
                vec![Value::Int(2), Value::from("fr"), Value::Null],
                vec![Value::Null, Value::from("de"), Value::from("d@x.io")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_filter_keeps_schema() {
        let table = customers();
        let filtered = table.filter(|row| row[2].is_null());

        assert_eq!(filtered.columns(), table.columns());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.value(0, "country"), Some(&Value::from("fr")));
    }

    #[test]
    fn test_filter_mask() {
        let table = customers();
        let filtered = table.filter_mask(&[true, false, false, true, false]);

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.value(1, "country"), Some(&Value::from("fr")));
    }

    #[test]
    fn test_group_by_single_key() {
        let table = customers();
        let grouped = table.group_by(&["id"]).unwrap();

        assert_eq!(grouped.group_count(), 3);
        let groups: Vec<_> = grouped.groups().collect();
        // Null key sorts first
        assert_eq!(groups[0].0, &vec![Value::Null]);
        assert_eq!(groups[2].0, &vec![Value::Int(2)]);
        assert_eq!(groups[2].1, &[0, 2, 3]);
    }

    #[test]
    fn test_group_by_composite_key() {
        let table = customers();
        let grouped = table.group_by(&["id", "country"]).unwrap();

        assert_eq!(grouped.group_count(), 4);
        let counts = grouped.count().unwrap();
        assert_eq!(counts.columns(), &["id", "country", "count"]);

        let us = counts
            .filter(|row| row[0] == Value::Int(2) && row[1] == Value::from("us"));
        assert_eq!(us.value(0, "count"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_count_column_avoids_key_names() {
        let table = Table::from_rows(
            ["count", "count_1"],
            vec![
                vec![Value::Int(5), Value::Int(1)],
                vec![Value::Int(5), Value::Int(1)],
            ],
        )
        .unwrap();

        let grouped = table.group_by(&["count"]).unwrap();
        assert_eq!(grouped.count_column(), "count_1");
        let counts = grouped.count().unwrap();
        assert_eq!(counts.columns(), &["count", "count_1"]);
        assert_eq!(counts.value(0, "count_1"), Some(&Value::Int(2)));

        let grouped = table.group_by(&["count", "count_1"]).unwrap();
        assert_eq!(grouped.count_column(), "count_2");
        assert_eq!(grouped.count().unwrap().columns()[2], "count_2");
    }

    #[test]
    fn test_group_by_missing_column() {
        let table = customers();
        let result = table.group_by(&["id", "region"]);
        assert_eq!(
            result.err(),
            Some(TableError::MissingColumn("region".to_string()))
        );
    }

    #[test]
    fn test_semi_join_returns_full_rows() {
        let table = customers();
        let keys = Table::from_rows(["id"], vec![vec![Value::Int(2)]]).unwrap();

        let joined = table.semi_join(&keys, &["id"]).unwrap();

        assert_eq!(joined.columns(), table.columns());
        assert_eq!(joined.len(), 3);
        assert!(joined.rows().iter().all(|row| row[0] == Value::Int(2)));
    }

    #[test]
    fn test_sort_by_is_stable() {
        let table = customers();
        let sorted = table.sort_by(&["id"]).unwrap();

        let emails: Vec<String> = sorted
            .column_values("email")
            .unwrap()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(emails, vec!["d@x.io", "a@x.io", "b@x.io", "c@x.io", "null"]);
    }

    #[test]
    fn test_select_reorders_columns() {
        let table = customers();
        let projected = table.select(&["email", "id"]).unwrap();

        assert_eq!(projected.columns(), &["email", "id"]);
        assert_eq!(projected.len(), table.len());
        assert_eq!(projected.value(1, "id"), Some(&Value::Int(1)));

        assert!(matches!(
            table.select(&["id", "id"]),
            Err(TableError::DuplicateColumn(_))
        ));
    }

    #[test]
    fn test_map_rows() {
        let table = customers();
        let upper = table.map_rows(|row| {
            let mut row = row.clone();
            if let Value::Text(country) = &row[1] {
                row[1] = Value::Text(country.to_uppercase());
            }
            row
        });

        assert_eq!(upper.value(0, "country"), Some(&Value::from("US")));
        assert_eq!(table.value(0, "country"), Some(&Value::from("us")));
    }
}
