//! Source location and fetch request configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DqError;
use crate::Result;

/// Default table to scan.
pub const DEFAULT_TABLE: &str = "customers";

/// Default remote host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default Postgres-wire port.
pub const DEFAULT_PORT: u16 = 5432;

/// Default user name.
pub const DEFAULT_USER: &str = "hive";

/// Default database name.
pub const DEFAULT_DATABASE: &str = "demo";

/// Columns projected alongside the email column by default.
const DEFAULT_ID_COLUMN: &str = "id";
const DEFAULT_TRAILING_COLUMNS: [&str; 2] = ["age", "country"];

/// Configuration for a remote source connection.
///
/// # Security
/// No password is stored here. For Postgres-wire stores the driver reads
/// `PGPASSWORD` when the URL carries none.
///
/// # Example
/// ```rust
/// use dqscan_core::source::SourceConfig;
///
/// let config = SourceConfig::default()
///     .with_host("warehouse.internal")
///     .with_database("sales");
///
/// assert!(config.validate().is_ok());
/// assert_eq!(
///     config.to_postgres_url().unwrap(),
///     "postgres://hive@warehouse.internal:5432/sales"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Host name or address
    pub host: String,
    /// Port number
    pub port: Option<u16>,
    /// Database name
    pub database: Option<String>,
    /// User name
    pub username: Option<String>,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Per-statement timeout
    pub query_timeout: Duration,
    /// Maximum pooled connections
    pub max_connections: u32,
    /// Whether sessions are forced read-only
    pub read_only: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: Some(DEFAULT_PORT),
            database: Some(DEFAULT_DATABASE.to_string()),
            username: Some(DEFAULT_USER.to_string()),
            connect_timeout: Duration::from_secs(30),
            query_timeout: Duration::from_secs(60),
            max_connections: 4,
            read_only: true,
        }
    }
}

impl std::fmt::Display for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SourceConfig({}{}{})",
            self.host,
            self.port.map_or_else(String::new, |p| format!(":{}", p)),
            self.database
                .as_ref()
                .map_or_else(String::new, |db| format!("/{}", db))
        )
    }
}

impl SourceConfig {
    /// Creates a configuration with default location and limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Sets the user name.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the per-statement timeout.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Validates connection parameters.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(DqError::configuration("host cannot be empty"));
        }

        if self.port == Some(0) {
            return Err(DqError::configuration("port must be greater than 0"));
        }

        if self.max_connections == 0 {
            return Err(DqError::configuration(
                "max_connections must be greater than 0",
            ));
        }

        if self.connect_timeout.is_zero() {
            return Err(DqError::configuration(
                "connect_timeout must be greater than 0",
            ));
        }

        if self.query_timeout.is_zero() {
            return Err(DqError::configuration(
                "query_timeout must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Builds a `postgres://` URL from the location fields.
    pub fn to_postgres_url(&self) -> Result<String> {
        self.validate()?;

        let mut url = url::Url::parse("postgres://localhost")
            .map_err(|e| DqError::configuration(format!("Invalid base URL: {}", e)))?;

        url.set_host(Some(&self.host))
            .map_err(|e| DqError::configuration(format!("Invalid host: {}", e)))?;
        url.set_port(self.port)
            .map_err(|_| DqError::configuration("Invalid port"))?;
        if let Some(username) = &self.username {
            url.set_username(username)
                .map_err(|_| DqError::configuration("Invalid user name"))?;
        }
        if let Some(database) = &self.database {
            url.set_path(database);
        }

        Ok(url.to_string())
    }

    /// Reads location fields back out of a `postgres://` URL.
    ///
    /// Missing parts keep their defaults; the password is ignored.
    pub fn from_url(connection_string: &str) -> Result<Self> {
        let url = url::Url::parse(connection_string)
            .map_err(|e| DqError::configuration(format!("Invalid connection URL: {}", e)))?;

        let mut config = Self::default();
        if let Some(host) = url.host_str() {
            config.host = host.to_string();
        }
        if let Some(port) = url.port() {
            config.port = Some(port);
        }
        if !url.username().is_empty() {
            config.username = Some(url.username().to_string());
        }
        let database = url.path().trim_start_matches('/');
        if !database.is_empty() {
            config.database = Some(database.to_string());
        }

        Ok(config)
    }
}

/// A table and explicit column projection to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Table name, optionally schema-qualified (`schema.table`)
    pub table: String,
    /// Projected columns, in output order
    pub columns: Vec<String>,
}

impl FetchRequest {
    /// Creates a request for the given table and columns.
    pub fn new<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Default projection: `id`, the email column, `age`, `country`.
    ///
    /// An email column that coincides with another projected name is not
    /// repeated.
    pub fn with_default_projection(table: impl Into<String>, email_column: &str) -> Self {
        let mut columns = vec![DEFAULT_ID_COLUMN.to_string()];
        for column in std::iter::once(email_column).chain(DEFAULT_TRAILING_COLUMNS) {
            if !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
            }
        }
        Self {
            table: table.into(),
            columns,
        }
    }

    /// Validates the table name and projection.
    pub fn validate(&self) -> Result<()> {
        if self.table.trim().is_empty() {
            return Err(DqError::configuration("table name cannot be empty"));
        }
        if self.columns.is_empty() {
            return Err(DqError::configuration(
                "projection must name at least one column",
            ));
        }
        for (position, column) in self.columns.iter().enumerate() {
            if column.trim().is_empty() {
                return Err(DqError::configuration(format!(
                    "projected column at position {} is blank",
                    position
                )));
            }
            if self.columns[..position].contains(column) {
                return Err(DqError::configuration(format!(
                    "column '{}' is projected more than once",
                    column
                )));
            }
        }
        Ok(())
    }

    /// Renders the projection as a `SELECT` statement with quoted identifiers.
    pub fn select_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ");
        format!("SELECT {} FROM {}", columns, quote_table_name(&self.table))
    }
}

/// Quotes an SQL identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quotes a table name, treating `.` as the schema separator.
pub fn quote_table_name(name: &str) -> String {
    name.split('.')
        .map(quote_identifier)
        .collect::<Vec<_>>()
        .join(".")
}
