//! Configuration for the migration runner (`migrate.yml`)

use crate::error::{MigrateError, MigrateResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default name of the version tracking table.
pub const DEFAULT_VERSION_TABLE: &str = "schema_version";

/// Default directory holding `*.sql` migration files.
pub const DEFAULT_MIGRATIONS_PATH: &str = "migrations";

/// Migration runner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrateConfig {
    /// Version tracking table, optionally schema-qualified (`meta.schema_version`)
    #[serde(default = "default_table")]
    pub table: String,

    /// Directory containing SQL migration files, relative to the config file
    #[serde(default = "default_migrations_path")]
    pub migrations_path: String,
}

fn default_table() -> String {
    DEFAULT_VERSION_TABLE.to_string()
}

fn default_migrations_path() -> String {
    DEFAULT_MIGRATIONS_PATH.to_string()
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            migrations_path: default_migrations_path(),
        }
    }
}

impl MigrateConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> MigrateResult<Self> {
        if !path.exists() {
            return Err(MigrateError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| MigrateError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: MigrateConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve `migrations_path` against `root` unless it is already absolute
    pub fn migrations_path_absolute(&self, root: &Path) -> PathBuf {
        let path = Path::new(&self.migrations_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> MigrateResult<()> {
        validate_table_name(&self.table)?;
        if self.migrations_path.trim().is_empty() {
            return Err(MigrateError::ConfigInvalid {
                message: "migrations_path cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Check that `name` is a bare or schema-qualified SQL identifier.
///
/// The table name is interpolated into DDL/DML, so only identifier characters
/// are accepted.
pub(crate) fn validate_table_name(name: &str) -> MigrateResult<()> {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() > 2 || !parts.iter().all(|p| is_identifier(p)) {
        return Err(MigrateError::ConfigInvalid {
            message: format!(
                "version table '{}' must be an identifier or schema.identifier",
                name
            ),
        });
    }
    Ok(())
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
