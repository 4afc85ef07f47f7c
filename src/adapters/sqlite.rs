//! SQLite period source.
//!
//! The query text lives in its own file so the selection can change without a rebuild.
//! Whatever it selects must yield the columns `id, start, end, price, product, priority`
//! in that order; dates are stored as `YYYY-MM-DD` text.

use crate::config::DatabaseConfig;
use crate::core::{Period, PeriodSource};
use crate::utils::error::{FlattenError, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SqliteSource {
    db_path: PathBuf,
    query_path: PathBuf,
    read_only: bool,
    application_name: Option<String>,
    debug: bool,
}

impl SqliteSource {
    pub fn new(database: &DatabaseConfig, query_path: impl Into<PathBuf>, debug: bool) -> Self {
        Self {
            db_path: PathBuf::from(&database.path),
            query_path: query_path.into(),
            read_only: database.read_only,
            application_name: database.application_name.clone(),
            debug,
        }
    }

    fn open(&self) -> Result<Connection> {
        let conn = if self.read_only {
            Connection::open_with_flags(
                &self.db_path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?
        } else {
            Connection::open(&self.db_path)?
        };

        if self.debug {
            tracing::debug!(
                "Connected to {} (read_only={}, application={})",
                self.db_path.display(),
                self.read_only,
                self.application_name.as_deref().unwrap_or("-")
            );
        }
        Ok(conn)
    }

    /// Reads the query file, runs it and scans every row. Any failure aborts the fetch.
    pub fn fetch_blocking(&self) -> Result<Vec<Period>> {
        let query = std::fs::read_to_string(&self.query_path).map_err(|e| {
            FlattenError::ConfigError {
                message: format!(
                    "failed to read query from '{}': {}",
                    self.query_path.display(),
                    e
                ),
            }
        })?;
        if self.debug {
            tracing::debug!("Query: {}", query.trim());
        }

        let conn = self.open()?;
        query_periods(&conn, &query)
    }
}

pub fn query_periods(conn: &Connection, query: &str) -> Result<Vec<Period>> {
    let mut stmt = conn.prepare(query)?;
    let rows = stmt.query_map([], |row| {
        Ok(Period {
            id: row.get(0)?,
            start: row.get(1)?,
            end: row.get(2)?,
            price: row.get(3)?,
            product: row.get(4)?,
            priority: row.get(5)?,
        })
    })?;

    let periods = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(periods)
}

impl PeriodSource for SqliteSource {
    async fn fetch_periods(&self) -> Result<Vec<Period>> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.fetch_blocking())
            .await
            .map_err(|e| FlattenError::ProcessingError {
                message: format!("database worker failed: {}", e),
            })?
    }

    fn describe(&self) -> String {
        format!(
            "sqlite database {} (query {})",
            self.db_path.display(),
            self.query_path.display()
        )
    }
}
