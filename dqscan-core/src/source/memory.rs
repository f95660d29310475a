//! In-process data source.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{DataSource, FetchError, FetchRequest, SourceType, fetch_failed};
use crate::Result;
use crate::models::Table;

/// Serves tables held in memory, keyed by name.
///
/// Fetching projects the stored table onto the requested columns, so a
/// missing column fails the same way it would against a database.
///
/// # Example
/// ```rust
/// use dqscan_core::models::Table;
/// use dqscan_core::source::{DataSource, FetchRequest, MemorySource};
///
/// let table = Table::new(["id", "email", "age", "country"]).unwrap();
/// let source = MemorySource::new().with_table("customers", table);
/// let request = FetchRequest::with_default_projection("customers", "email");
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let fetched = runtime.block_on(source.fetch(&request)).unwrap();
/// assert_eq!(fetched.columns(), request.columns.as_slice());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<String, Table>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table, builder style.
    pub fn with_table(mut self, name: impl Into<String>, table: Table) -> Self {
        self.insert(name, table);
        self
    }

    /// Adds or replaces a table.
    pub fn insert(&mut self, name: impl Into<String>, table: Table) {
        self.tables.insert(name.into(), table);
    }

    /// Names of the stored tables.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<Table> {
        request.validate()?;

        let table = self
            .tables
            .get(&request.table)
            .ok_or_else(|| {
                fetch_failed(
                    &request.table,
                    FetchError::MissingTable(request.table.clone()),
                )
            })?;

        let projected = table
            .select(request.columns.as_slice())
            .map_err(|e| fetch_failed(&request.table, e))?;

        tracing::debug!(
            table = %request.table,
            rows = projected.len(),
            "Fetched in-memory table"
        );

        Ok(projected)
    }

    fn source_type(&self) -> SourceType {
        SourceType::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DqError, Phase};
    use crate::models::Value;

    fn source() -> MemorySource {
        let table = Table::from_rows(
            ["country", "age", "email", "id", "signup"],
            vec![vec![
                Value::from("us"),
                Value::from("30"),
                Value::from("a@b.com"),
                Value::from("1"),
                Value::from("2024-01-01"),
            ]],
        )
        .unwrap();
        MemorySource::new().with_table("customers", table)
    }

    #[tokio::test]
    async fn test_fetch_projects_columns() {
        let request = FetchRequest::with_default_projection("customers", "email");
        let table = source().fetch(&request).await.unwrap();

        assert_eq!(table.columns(), &["id", "email", "age", "country"]);
        assert_eq!(table.value(0, "id"), Some(&Value::from("1")));
    }

    #[tokio::test]
    async fn test_fetch_missing_table() {
        let request = FetchRequest::new("orders", ["id"]);
        let error = source().fetch(&request).await.unwrap_err();

        assert!(matches!(error, DqError::Source { .. }));
        assert_eq!(error.phase(), Some(Phase::Fetch));
    }

    #[tokio::test]
    async fn test_fetch_missing_column() {
        let request = FetchRequest::new("customers", ["id", "phone"]);
        let error = source().fetch(&request).await.unwrap_err();
        assert_eq!(error.phase(), Some(Phase::Fetch));
    }

    #[tokio::test]
    async fn test_fetch_invalid_request() {
        let request = FetchRequest::new("customers", Vec::<String>::new());
        let error = source().fetch(&request).await.unwrap_err();
        assert!(matches!(error, DqError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_memory_source_metadata() {
        let source = source();
        assert!(source.test_connection().await.is_ok());
        assert_eq!(source.source_type(), SourceType::Memory);
        assert_eq!(source.table_names().collect::<Vec<_>>(), vec!["customers"]);
    }
}
