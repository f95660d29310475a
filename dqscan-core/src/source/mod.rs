//! Data sources that deliver the raw table.
//!
//! A [`DataSource`] takes a [`FetchRequest`] (table plus explicit column
//! projection) and returns a fully materialized [`Table`]. Every failure to
//! deliver rows, including a missing table or column, surfaces as
//! [`DqError::Source`] so it is reported as a fetch-phase error.
//!
//! # Module Structure
//! - `config`: [`SourceConfig`] and [`FetchRequest`]
//! - `memory`: in-process tables
//! - `sqlite`: SQLite files and in-memory databases (feature `sqlite`)
//! - `postgres`: Postgres-wire stores (feature `postgresql`)

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Result;
use crate::error::DqError;
use crate::models::Table;

pub mod config;
pub mod memory;

#[cfg(feature = "postgresql")]
pub mod postgres;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use config::{
    DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TABLE, DEFAULT_USER, FetchRequest,
    SourceConfig, quote_identifier, quote_table_name,
};
pub use memory::MemorySource;

/// Kinds of data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// In-process tables
    Memory,
    /// SQLite database
    Sqlite,
    /// PostgreSQL or another Postgres-wire store
    Postgres,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceType::Memory => "memory",
            SourceType::Sqlite => "sqlite",
            SourceType::Postgres => "postgres",
        };
        f.write_str(name)
    }
}

/// Structural fetch failures not raised by a driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("table '{0}' does not exist")]
    MissingTable(String),
}

/// Source of raw rows.
///
/// This trait is object-safe so sources can be selected at runtime through
/// `Box<dyn DataSource>`.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Checks that the source is reachable.
    ///
    /// # Errors
    /// Returns [`DqError::Source`] if the connection fails.
    async fn test_connection(&self) -> Result<()>;

    /// Fetches the projected columns of a table.
    ///
    /// The returned table's schema is exactly `request.columns`, in order.
    ///
    /// # Errors
    /// Returns [`DqError::Source`] if the table or a column does not exist
    /// or the source fails, and [`DqError::Configuration`] for an invalid
    /// request.
    async fn fetch(&self, request: &FetchRequest) -> Result<Table>;

    /// Returns the kind of this source.
    fn source_type(&self) -> SourceType;
}

/// Creates a source from a connection string.
///
/// # Errors
/// Returns [`DqError::Configuration`] if the format is not recognized or
/// support for the detected source is not compiled in.
pub async fn create_source(connection_string: &str) -> Result<Box<dyn DataSource>> {
    match detect_source_type(connection_string)? {
        #[cfg(feature = "postgresql")]
        SourceType::Postgres => {
            let source = postgres::PostgresSource::new(connection_string).await?;
            Ok(Box::new(source))
        }
        #[cfg(not(feature = "postgresql"))]
        SourceType::Postgres => Err(DqError::configuration(
            "PostgreSQL support not compiled in. Use --features postgresql",
        )),
        #[cfg(feature = "sqlite")]
        SourceType::Sqlite => {
            let source = sqlite::SqliteSource::new(connection_string).await?;
            Ok(Box::new(source))
        }
        #[cfg(not(feature = "sqlite"))]
        SourceType::Sqlite => Err(DqError::configuration(
            "SQLite support not compiled in. Use --features sqlite",
        )),
        SourceType::Memory => Err(DqError::configuration(
            "In-memory sources cannot be opened from a connection string",
        )),
    }
}

/// Detects the source kind from a connection string.
///
/// # Errors
/// Returns [`DqError::Configuration`] for unrecognized formats.
pub fn detect_source_type(connection_string: &str) -> Result<SourceType> {
    if connection_string.starts_with("postgres://")
        || connection_string.starts_with("postgresql://")
    {
        Ok(SourceType::Postgres)
    } else if connection_string.starts_with("sqlite:")
        || connection_string == ":memory:"
        || connection_string.ends_with(".db")
        || connection_string.ends_with(".sqlite")
        || connection_string.ends_with(".sqlite3")
    {
        Ok(SourceType::Sqlite)
    } else {
        Err(DqError::configuration(
            "Unrecognized connection string format",
        ))
    }
}

/// Wraps a driver or structural failure as a fetch error for `table`.
pub(crate) fn fetch_failed<E>(table: &str, error: E) -> DqError
where
    E: std::error::Error + Send + Sync + 'static,
{
    DqError::source_failed(format!("Failed to fetch table '{}'", table), error)
}
