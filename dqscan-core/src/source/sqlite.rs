//! SQLite data source.
//!
//! # Connection Modes
//! - File-based: `sqlite:///path/to/database.db` or a bare `*.db` path
//! - In-memory: `sqlite::memory:` or `:memory:`
//!
//! File databases are opened read-only. SQLite is dynamically typed, so each
//! cell is decoded by trying text, integer, real, boolean and blob in turn.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};

use super::{DataSource, FetchRequest, SourceConfig, SourceType, fetch_failed};
use crate::Result;
use crate::error::{DqError, Phase};
use crate::models::{Row as TableRow, Table, Value};

/// SQLite data source.
pub struct SqliteSource {
    /// Connection pool (a single connection is enough for SQLite)
    pub pool: SqlitePool,
    /// Connection limits and timeouts
    pub config: SourceConfig,
    /// Original connection string
    pub connection_string: String,
}

impl std::fmt::Debug for SqliteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteSource")
            .field("config", &self.config)
            .field("is_in_memory", &self.is_in_memory())
            .finish_non_exhaustive()
    }
}

impl SqliteSource {
    /// Opens a SQLite database from a connection string.
    ///
    /// # Errors
    /// Returns [`DqError::Configuration`] for a malformed connection string
    /// and [`DqError::Source`] if the database cannot be opened.
    pub async fn new(connection_string: &str) -> Result<Self> {
        let mut config = SourceConfig::default();
        config.max_connections = 1;
        config.port = None;
        Self::with_config(connection_string, config).await
    }

    /// Opens a SQLite database with explicit limits.
    pub async fn with_config(connection_string: &str, config: SourceConfig) -> Result<Self> {
        config.validate()?;

        let normalized = normalize_connection_string(connection_string);
        let mut options = SqliteConnectOptions::from_str(&normalized).map_err(|e| {
            DqError::configuration(format!("Invalid SQLite connection string: {}", e))
        })?;

        if config.read_only && !is_memory_string(connection_string) {
            options = options.read_only(true);
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(config.connect_timeout)
            .connect_with(options)
            .await
            .map_err(DqError::connection_failed)?;

        Ok(Self {
            pool,
            config,
            connection_string: connection_string.to_string(),
        })
    }

    /// Checks if the connection is to an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        is_memory_string(&self.connection_string)
    }

    /// Closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl DataSource for SqliteSource {
    async fn test_connection(&self) -> Result<()> {
        let result: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(DqError::connection_failed)?;

        if result != 1 {
            return Err(DqError::configuration(
                "Basic connectivity test failed: unexpected result",
            ));
        }

        Ok(())
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<Table> {
        request.validate()?;

        let sql = request.select_sql();
        tracing::debug!("Fetching from SQLite with query: {}", sql);

        let rows: Vec<SqliteRow> = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| fetch_failed(&request.table, e))?;

        let mut table =
            Table::new(request.columns.iter()).map_err(|e| e.in_phase(Phase::Fetch))?;
        for row in &rows {
            let values: TableRow = (0..request.columns.len())
                .map(|index| extract_column_value(row, index))
                .collect();
            table
                .push_row(values)
                .map_err(|e| e.in_phase(Phase::Fetch))?;
        }

        tracing::info!(table = %request.table, rows = table.len(), "Fetched SQLite table");
        Ok(table)
    }

    fn source_type(&self) -> SourceType {
        SourceType::Sqlite
    }
}

/// Decodes one cell into a raw value.
///
/// Reals and booleans keep their textual form; blobs become
/// `base64:`-prefixed text. Undecodable cells are null.
fn extract_column_value(row: &SqliteRow, index: usize) -> Value {
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return v.map_or(Value::Null, Value::Text);
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return v.map_or(Value::Null, Value::Int);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return v.map_or(Value::Null, |n| Value::Text(n.to_string()));
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return v.map_or(Value::Null, |b| Value::Text(b.to_string()));
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return v.map_or(Value::Null, |bytes| {
            use base64::Engine;
            let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
            Value::Text(format!("base64:{}", encoded))
        });
    }

    Value::Null
}

fn is_memory_string(connection_string: &str) -> bool {
    connection_string.contains(":memory:") || connection_string.contains("mode=memory")
}

/// Normalizes a connection string to SQLite URL format.
fn normalize_connection_string(connection_string: &str) -> String {
    if connection_string == ":memory:" {
        return "sqlite::memory:".to_string();
    }

    if connection_string.starts_with("sqlite:") {
        return connection_string.to_string();
    }

    format!("sqlite://{}", connection_string)
}
