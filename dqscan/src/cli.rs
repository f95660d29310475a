//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dqscan_core::{
    DqConfig, FetchRequest, Result, SourceConfig,
    source::{DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TABLE, DEFAULT_USER},
};

#[derive(Debug, Parser)]
#[command(name = "dqscan")]
#[command(about = "Data quality scan for a remote table")]
#[command(version)]
#[command(long_about = "
dqscan - Normalization and data quality metrics for one table

Fetches `id`, the email column, `age` and `country` from a table, then:
- Coerces id/age to integers (non-digit text becomes null)
- Collapses blank emails to null
- Counts rows, missing or invalid emails, and duplicate keys

Results are printed as text tables; --output also writes a JSON report.

SUPPORTED SOURCES:
- PostgreSQL and Postgres-wire stores (postgres://)
- SQLite (sqlite:// or .db/.sqlite files)

EXAMPLES:
  dqscan --host warehouse --db demo --table customers
  dqscan --database-url sqlite:///data/customers.db --pk id,country
  DATABASE_URL=postgres://hive@localhost/demo dqscan --output dq.json
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub scan: ScanArgs,
}

impl Cli {
    /// Scan arguments from the `scan` subcommand or the top level.
    pub fn scan_args(&self) -> &ScanArgs {
        match &self.command {
            Some(Command::Scan(args)) => args,
            _ => &self.scan,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, normalize and evaluate a table (default)
    Scan(ScanArgs),
    /// Test the source connection
    Test(SourceArgs),
    /// List supported source types
    List,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(
        short,
        long,
        global = true,
        help = "Suppress all log output except errors"
    )]
    pub quiet: bool,
}

/// Where to read from.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Full connection URL; overrides the location flags
    #[arg(
        long,
        env = "DATABASE_URL",
        help = "Source connection string (credentials will be sanitized in logs)"
    )]
    pub database_url: Option<String>,

    /// Source host
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Source port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// User name (password via PGPASSWORD)
    #[arg(long, default_value = DEFAULT_USER)]
    pub user: String,

    /// Database name
    #[arg(long = "db", default_value = DEFAULT_DATABASE)]
    pub database: String,
}

impl SourceArgs {
    /// Source location and limits from the flags.
    pub fn source_config(&self) -> SourceConfig {
        SourceConfig::new()
            .with_host(&self.host)
            .with_port(self.port)
            .with_username(&self.user)
            .with_database(&self.database)
    }

    /// Connection string from `--database-url` or the location flags.
    pub fn connection_string(&self) -> Result<String> {
        match &self.database_url {
            Some(url) => Ok(url.clone()),
            None => self.source_config().to_postgres_url(),
        }
    }
}

/// What to scan and how.
#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Table to scan
    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: String,

    /// Column holding email addresses
    #[arg(long = "email-col", default_value = "email")]
    pub email_column: String,

    /// Duplicate-detection key
    #[arg(
        long,
        default_value = "id",
        help = "Comma-separated key columns, e.g. id or id,country (empty disables)"
    )]
    pub pk: String,

    /// Explicit projection
    #[arg(
        long,
        value_delimiter = ',',
        help = "Comma-separated columns to fetch (default: id,<email-col>,age,country)"
    )]
    pub columns: Vec<String>,

    /// Rows shown per table
    #[arg(long, default_value_t = crate::render::DEFAULT_SHOW_ROWS)]
    pub show: usize,

    /// JSON report path
    #[arg(short, long, help = "Also write a JSON report to this path")]
    pub output: Option<PathBuf>,
}

impl ScanArgs {
    /// Evaluation parameters.
    pub fn dq_config(&self) -> DqConfig {
        DqConfig::new()
            .with_email_column(&self.email_column)
            .with_key_list(&self.pk)
    }

    /// Table and projection to fetch.
    pub fn fetch_request(&self) -> FetchRequest {
        if self.columns.is_empty() {
            FetchRequest::with_default_projection(&self.table, &self.email_column)
        } else {
            FetchRequest::new(&self.table, self.columns.iter())
        }
    }
}
