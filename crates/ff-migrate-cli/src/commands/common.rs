//! Shared utilities for CLI commands

use anyhow::{bail, Context, Result};
use duckdb::Connection;
use ff_migrate::{load_sql_dir, MigrateConfig, SqlMigration};
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Everything a command needs to talk to one database.
pub(crate) struct MigrationContext {
    pub(crate) config: MigrateConfig,
    pub(crate) migrations_dir: PathBuf,
    pub(crate) steps: Vec<SqlMigration>,
    pub(crate) conn: Connection,
}

/// Load config, SQL steps, and open the database named by the global args.
pub(crate) fn load_context(global: &GlobalArgs) -> Result<MigrationContext> {
    let (config, root) = load_config(global)?;
    let migrations_dir = match &global.dir {
        Some(dir) => PathBuf::from(dir),
        None => config.migrations_path_absolute(&root),
    };

    let steps = load_sql_dir(&migrations_dir).with_context(|| {
        format!(
            "Failed to load migrations from {}",
            migrations_dir.display()
        )
    })?;
    log::debug!(
        "Loaded {} migrations from {}",
        steps.len(),
        migrations_dir.display()
    );

    let conn = open_database(global.database.as_deref())?;
    Ok(MigrationContext {
        config,
        migrations_dir,
        steps,
        conn,
    })
}

/// Load `--config` if given; migration paths resolve against its directory.
fn load_config(global: &GlobalArgs) -> Result<(MigrateConfig, PathBuf)> {
    match &global.config {
        Some(path) => {
            let path = Path::new(path);
            let config = MigrateConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            Ok((config, root))
        }
        None => Ok((MigrateConfig::default(), PathBuf::from("."))),
    }
}

/// Open a DuckDB connection (handles the `:memory:` special case)
pub(crate) fn open_database(database: Option<&str>) -> Result<Connection> {
    let Some(database) = database else {
        bail!("No database given: pass --database or set FF_MIGRATE_DATABASE");
    };
    if database == ":memory:" {
        Connection::open_in_memory().context("Failed to open in-memory database")
    } else {
        Connection::open(database).with_context(|| format!("Failed to open database {}", database))
    }
}
