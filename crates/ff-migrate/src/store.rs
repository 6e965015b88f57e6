//! Version store: the single-row table recording the applied schema version.

use crate::config::{validate_table_name, MigrateConfig};
use crate::error::{MigrateError, MigrateResult};
use duckdb::Connection;

/// Durable storage for the current schema version.
///
/// The stored value is the number of steps applied in order, starting at 1.
pub trait VersionStore {
    /// Read the stored version.
    ///
    /// Returns `None` when the tracking table is missing *or* the read fails
    /// for any other reason; both cases lead the runner to bootstrap.
    fn read(&self, conn: &Connection) -> Option<u32>;

    /// Create the tracking table and seed it with version 0.
    ///
    /// Must fail if the table already exists rather than resetting it.
    fn bootstrap(&self, conn: &Connection) -> MigrateResult<()>;

    /// Record `version` as applied.
    fn write(&self, conn: &Connection, version: u32) -> MigrateResult<()>;
}

/// [`VersionStore`] backed by a DuckDB table with one `version` column.
#[derive(Debug, Clone)]
pub struct DuckDbVersionStore {
    table: String,
}

impl DuckDbVersionStore {
    /// Build a store for the table named in `config`
    pub fn new(config: &MigrateConfig) -> MigrateResult<Self> {
        Self::with_table(&config.table)
    }

    /// Build a store for an explicit table name
    pub fn with_table(table: &str) -> MigrateResult<Self> {
        validate_table_name(table)?;
        Ok(Self {
            table: table.to_string(),
        })
    }

    /// Name of the tracking table
    pub fn table(&self) -> &str {
        &self.table
    }

    fn schema(&self) -> Option<&str> {
        self.table.rsplit_once('.').map(|(schema, _)| schema)
    }

    fn bootstrap_err(&self, source: duckdb::Error) -> MigrateError {
        MigrateError::Bootstrap {
            table: self.table.clone(),
            source,
        }
    }
}

impl Default for DuckDbVersionStore {
    fn default() -> Self {
        Self {
            table: crate::config::DEFAULT_VERSION_TABLE.to_string(),
        }
    }
}

impl VersionStore for DuckDbVersionStore {
    fn read(&self, conn: &Connection) -> Option<u32> {
        let sql = format!("SELECT version FROM {}", self.table);
        match conn.query_row(&sql, [], |row| row.get::<_, i32>(0)) {
            Ok(version) => match u32::try_from(version) {
                Ok(v) => Some(v),
                Err(_) => {
                    log::debug!("Ignoring out-of-range version {} in {}", version, self.table);
                    None
                }
            },
            Err(e) => {
                log::debug!("Could not read schema version from {}: {}", self.table, e);
                None
            }
        }
    }

    fn bootstrap(&self, conn: &Connection) -> MigrateResult<()> {
        if let Some(schema) = self.schema() {
            conn.execute_batch(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
                .map_err(|e| self.bootstrap_err(e))?;
        }

        conn.execute_batch(&format!(
            "CREATE TABLE {} (version INTEGER NOT NULL PRIMARY KEY)",
            self.table
        ))
        .map_err(|e| self.bootstrap_err(e))?;

        conn.execute(
            &format!("INSERT INTO {} (version) VALUES (0)", self.table),
            [],
        )
        .map_err(|e| self.bootstrap_err(e))?;

        log::info!("Created version table {} at version 0", self.table);
        Ok(())
    }

    fn write(&self, conn: &Connection, version: u32) -> MigrateResult<()> {
        conn.execute(
            &format!("UPDATE {} SET version = ?", self.table),
            duckdb::params![i64::from(version)],
        )
        .map_err(|e| MigrateError::VersionWrite { version, source: e })?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
