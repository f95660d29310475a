//! PostgreSQL data source.
//!
//! Works with PostgreSQL and with analytical stores that speak its wire
//! protocol. Each row is fetched as `row_to_json` and decoded through
//! [`Table::from_json_records`], so integer columns arrive as integers and
//! everything else in its textual form.
//!
//! # Session Settings
//! Every pooled connection gets a statement timeout, an application name
//! and, unless disabled, `default_transaction_read_only`.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;

use super::{DataSource, FetchRequest, SourceConfig, SourceType, fetch_failed};
use crate::Result;
use crate::error::{DqError, Phase, redact_database_url};
use crate::models::Table;

/// PostgreSQL data source with a lazily connected pool.
pub struct PostgresSource {
    /// Connection pool
    pub pool: PgPool,
    /// Connection configuration (no credentials)
    pub config: SourceConfig,
}

impl std::fmt::Debug for PostgresSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresSource")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PostgresSource {
    /// Creates a source from a `postgres://` URL.
    ///
    /// No connection is made until the first query.
    ///
    /// # Errors
    /// Returns [`DqError::Configuration`] if the URL is malformed.
    pub async fn new(connection_string: &str) -> Result<Self> {
        let config = SourceConfig::from_url(connection_string)?;
        Self::with_config(connection_string, config).await
    }

    /// Creates a source with explicit limits and timeouts.
    pub async fn with_config(connection_string: &str, config: SourceConfig) -> Result<Self> {
        config.validate()?;

        let query_timeout_secs = config.query_timeout.as_secs();
        let read_only = config.read_only;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections.min(100))
            .acquire_timeout(config.connect_timeout)
            .test_before_acquire(true)
            .after_connect(move |conn, _meta| {
                Box::pin(async move {
                    conn.execute(
                        format!("SET statement_timeout = '{}s'", query_timeout_secs).as_str(),
                    )
                    .await?;

                    let app_name = format!("dqscan-{}", env!("CARGO_PKG_VERSION"));
                    conn.execute(format!("SET application_name = '{}'", app_name).as_str())
                        .await?;

                    if read_only {
                        conn.execute("SET default_transaction_read_only = on")
                            .await?;
                    }

                    Ok(())
                })
            })
            .connect_lazy(connection_string)
            .map_err(|e| {
                DqError::configuration(format!(
                    "Invalid PostgreSQL connection string {}: {}",
                    redact_database_url(connection_string),
                    e
                ))
            })?;

        tracing::debug!("Created PostgreSQL source for {}", config);

        Ok(Self { pool, config })
    }

    /// Closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl DataSource for PostgresSource {
    async fn test_connection(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(DqError::connection_failed)?;
        Ok(())
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<Table> {
        request.validate()?;

        let sql = format!(
            "SELECT row_to_json(t) AS row_data FROM ({}) t",
            request.select_sql()
        );
        tracing::debug!("Fetching from PostgreSQL with query: {}", sql);

        let records: Vec<JsonValue> = sqlx::query_scalar(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| fetch_failed(&request.table, e))?;

        let table = Table::from_json_records(request.columns.iter(), &records)
            .map_err(|e| e.in_phase(Phase::Fetch))?;

        tracing::info!(table = %request.table, rows = table.len(), "Fetched PostgreSQL table");
        Ok(table)
    }

    fn source_type(&self) -> SourceType {
        SourceType::Postgres
    }
}
