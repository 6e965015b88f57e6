//! Error types for ff-migrate

use thiserror::Error;

/// Error produced by a single migration step.
pub type StepError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Outcome of running one migration step.
pub type StepResult = Result<(), StepError>;

/// Migration runner errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// The version table could not be created or seeded (MG001)
    #[error("[MG001] Failed to create version table {table}: {source}")]
    Bootstrap {
        table: String,
        #[source]
        source: duckdb::Error,
    },

    /// A pending step returned an error or panicked (MG002)
    #[error("[MG002] Failed to migrate to version {version}: {source}")]
    Step {
        version: u32,
        #[source]
        source: StepError,
    },

    /// The step ran but its version could not be recorded (MG003)
    #[error("[MG003] Failed to set schema version to {version}: {source}")]
    VersionWrite {
        version: u32,
        #[source]
        source: duckdb::Error,
    },

    /// Config file not found (MG004)
    #[error("[MG004] Migration config not found: {path}")]
    ConfigNotFound { path: String },

    /// Config file is not valid YAML for [`crate::MigrateConfig`] (MG005)
    #[error("[MG005] Failed to parse migration config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Config value rejected by validation (MG006)
    #[error("[MG006] Invalid migration config: {message}")]
    ConfigInvalid { message: String },

    /// Filesystem error while loading config or SQL files (MG007)
    #[error("[MG007] IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;

/// Error synthesized when a step panics with a payload that is not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("panic from migration step: {message}")]
pub struct StepPanic {
    /// Text of the panic payload.
    pub message: String,
}
