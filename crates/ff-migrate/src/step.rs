//! Migration steps.
//!
//! A step is any unit of work that takes the connection and succeeds or
//! fails. Steps carry no identity beyond their position in the list handed
//! to the runner, so that list must only ever grow at the end.

use crate::error::{MigrateError, MigrateResult, StepResult};
use duckdb::{Connection, Params};
use std::path::Path;

/// A single schema migration step.
pub trait Migration {
    /// Apply the step to `conn`.
    fn apply(&self, conn: &Connection) -> StepResult;

    /// Label used in log output only.
    fn name(&self) -> Option<&str> {
        None
    }
}

impl<F> Migration for F
where
    F: Fn(&Connection) -> StepResult,
{
    fn apply(&self, conn: &Connection) -> StepResult {
        self(conn)
    }
}

impl Migration for Box<dyn Migration> {
    fn apply(&self, conn: &Connection) -> StepResult {
        (**self).apply(conn)
    }

    fn name(&self) -> Option<&str> {
        (**self).name()
    }
}

/// A step made of SQL text, run with `execute_batch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlMigration {
    name: String,
    sql: String,
}

impl SqlMigration {
    pub fn new(name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql: sql.into(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl Migration for SqlMigration {
    fn apply(&self, conn: &Connection) -> StepResult {
        conn.execute_batch(&self.sql)?;
        Ok(())
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// Load every `*.sql` file in `dir` as a step, ordered by file name.
///
/// Files are named so that new migrations sort last (`0001_init.sql`,
/// `0002_add_orders.sql`, ...).
pub fn load_sql_dir(dir: &Path) -> MigrateResult<Vec<SqlMigration>> {
    let io_err = |path: &Path, source| MigrateError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
        let path = entry.map_err(|e| io_err(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    paths
        .into_iter()
        .map(|path| {
            let sql = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(SqlMigration::new(name, sql))
        })
        .collect()
}

/// Execute a statement, panicking with the driver error on failure.
///
/// Meant for use inside steps that chain several statements. The panic
/// payload is the [`duckdb::Error`] itself, which [`crate::run_contained`]
/// surfaces unchanged as the step's error.
pub fn must_execute<P: Params>(conn: &Connection, sql: &str, params: P) -> usize {
    match conn.execute(sql, params) {
        Ok(rows) => rows,
        Err(e) => std::panic::panic_any(e),
    }
}

#[cfg(test)]
#[path = "step_test.rs"]
mod tests;
