//! Database Connection and Query Execution
//!
//! This module owns the single live `PostgreSQL` connection for the process
//! lifetime and provides the three statement shapes everything else is built
//! on: mutate, fetch-as-rows, and existence check.
//!
//! # Design
//! - One connection, established at startup, released once at shutdown.
//!   Connection failure is fatal; the binary exits before any menu is shown.
//! - All SQL is parameterized (`$n` placeholders). No statement text is ever
//!   assembled from raw console input.
//! - Fetched column values are reduced to display strings regardless of the
//!   underlying type; the console renderer is the only consumer.
//! - Statement and result handles are scoped inside each call; every exit
//!   path releases them.

use tokio::task::JoinHandle;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, Config, NoTls, Row, Transaction};
use tracing::{debug, info};

use crate::error::{ChitterError, Result};

/// Parameters needed to establish the database connection
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    /// Hostname of the database server
    pub host: String,

    /// Port number
    pub port: u16,

    /// Database name
    pub database: String,

    /// Username for the database connection
    pub user: String,

    /// Password for the database connection
    /// WARNING: sensitive, never logged
    pub password: String,
}

impl ConnectionParams {
    /// Build the driver-level connection config
    fn to_pg_config(&self) -> Config {
        let mut config = Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .user(&self.user)
            .password(&self.password)
            .dbname(&self.database);
        config
    }
}

/// The live database connection
///
/// Owns the `tokio-postgres` client and the spawned driver task that services
/// it. Dropping (or calling [`Db::close`]) tears both down; teardown is
/// best-effort and never fails.
pub struct Db {
    client: Client,
    driver: JoinHandle<()>,
}

impl Db {
    /// Connect to the database.
    ///
    /// Fail-fast contract: callers treat an error here as fatal. There is no
    /// retry or backoff; the tool is interactive and unusable without the
    /// database.
    pub async fn connect(params: &ConnectionParams) -> Result<Self> {
        let pg_config = params.to_pg_config();

        let (client, connection) = pg_config.connect(NoTls).await.map_err(|e| {
            ChitterError::connection_failed(format!(
                "could not connect to {}:{}/{}: {e}",
                params.host, params.port, params.database
            ))
        })?;

        // Drive the connection on a background task.
        // Note: connection errors are not logged to prevent credential leakage.
        let driver = tokio::spawn(async move {
            let _ = connection.await;
        });

        info!(host = %params.host, port = params.port, database = %params.database, "connected");

        Ok(Self { client, driver })
    }

    /// Execute a mutating statement (INSERT, UPDATE, DELETE).
    ///
    /// Returns the number of rows affected.
    pub async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> Result<u64> {
        debug!(sql, "execute");
        self.client.execute(sql, params).await.map_err(|e| ChitterError::from_db(&e))
    }

    /// Run a SELECT and return every row, each column stringified for display.
    ///
    /// NULL becomes the empty string; fixed-width `char` columns are
    /// right-trimmed. The entire result materializes in memory; callers bound
    /// result size with `LIMIT` where it matters.
    pub async fn query_rows(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Vec<String>>> {
        debug!(sql, "query_rows");
        let rows =
            self.client.query(sql, params).await.map_err(|e| ChitterError::from_db(&e))?;

        rows.iter().map(row_to_strings).collect()
    }

    /// Existence check: true if the statement returns at least one row.
    ///
    /// This is deliberately boolean. It never reports how many rows matched,
    /// and no caller should pretend otherwise.
    pub async fn exists(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> Result<bool> {
        debug!(sql, "exists");
        let rows =
            self.client.query(sql, params).await.map_err(|e| ChitterError::from_db(&e))?;
        Ok(!rows.is_empty())
    }

    /// Begin an explicit transaction for multi-statement sequences
    /// (account creation, contact/block list swaps).
    pub async fn transaction(&mut self) -> Result<Transaction<'_>> {
        self.client.transaction().await.map_err(|e| ChitterError::from_db(&e))
    }

    /// Release the connection.
    ///
    /// Consumes the handle, so it can only happen once; errors during
    /// teardown are swallowed (best-effort cleanup on shutdown).
    pub fn close(self) {
        self.driver.abort();
        info!("disconnected");
    }
}

/// Stringify every column of a row for console display
pub(crate) fn row_to_strings(row: &Row) -> Result<Vec<String>> {
    (0..row.columns().len()).map(|idx| display_value(row, idx)).collect()
}

/// Convert a single column value to its display string
///
/// Mirrors the driver's type map but flattens everything to text: the console
/// front-end has no use for typed values. Every arm fetches `Option<T>` so a
/// NULL in any column type becomes the empty string.
fn display_value(row: &Row, idx: usize) -> Result<String> {
    use tokio_postgres::types::Type;

    let col_type = row.columns()[idx].type_();

    let value = match *col_type {
        Type::BOOL => row
            .try_get::<_, Option<bool>>(idx)
            .map_err(|e| {
                ChitterError::query_failed(format!("failed to get boolean value: {e}"))
            })?
            .map(|v| v.to_string()),

        Type::INT2 => row
            .try_get::<_, Option<i16>>(idx)
            .map_err(|e| ChitterError::query_failed(format!("failed to get i16 value: {e}")))?
            .map(|v| v.to_string()),
        Type::INT4 => row
            .try_get::<_, Option<i32>>(idx)
            .map_err(|e| ChitterError::query_failed(format!("failed to get i32 value: {e}")))?
            .map(|v| v.to_string()),
        Type::INT8 => row
            .try_get::<_, Option<i64>>(idx)
            .map_err(|e| ChitterError::query_failed(format!("failed to get i64 value: {e}")))?
            .map(|v| v.to_string()),

        // Fixed-width char columns arrive space-padded; trim for display
        Type::BPCHAR => row
            .try_get::<_, Option<String>>(idx)
            .map_err(|e| ChitterError::query_failed(format!("failed to get char value: {e}")))?
            .map(|v| v.trim_end().to_string()),

        Type::VARCHAR | Type::TEXT | Type::NAME => row
            .try_get::<_, Option<String>>(idx)
            .map_err(|e| {
                ChitterError::query_failed(format!("failed to get string value: {e}"))
            })?,

        Type::TIMESTAMP => {
            use chrono::NaiveDateTime;
            row.try_get::<_, Option<NaiveDateTime>>(idx)
                .map_err(|e| {
                    ChitterError::query_failed(format!("failed to get timestamp value: {e}"))
                })?
                .map(|v| v.format("%Y-%m-%d %H:%M:%S").to_string())
        }
        Type::TIMESTAMPTZ => {
            use chrono::{DateTime, Utc};
            row.try_get::<_, Option<DateTime<Utc>>>(idx)
                .map_err(|e| {
                    ChitterError::query_failed(format!("failed to get timestamptz value: {e}"))
                })?
                .map(|v| v.format("%Y-%m-%d %H:%M:%S").to_string())
        }
        Type::DATE => {
            use chrono::NaiveDate;
            row.try_get::<_, Option<NaiveDate>>(idx)
                .map_err(|e| {
                    ChitterError::query_failed(format!("failed to get date value: {e}"))
                })?
                .map(|v| v.format("%Y-%m-%d").to_string())
        }

        // Default: try to get as string
        _ => row.try_get::<_, Option<String>>(idx).map_err(|e| {
            ChitterError::query_failed(format!(
                "failed to display PostgreSQL type '{}': {}",
                col_type.name(),
                e
            ))
        })?,
    };

    Ok(value.unwrap_or_default())
}
