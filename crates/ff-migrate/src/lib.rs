//! ff-migrate - Sequential schema migrations for DuckDB databases
//!
//! Brings a database from the version recorded in its single-row tracking
//! table up to the latest version implied by an ordered list of steps.
//! A step is identified only by its 1-based position in that list.

pub mod config;
pub mod containment;
pub mod error;
pub mod runner;
pub mod step;
pub mod store;

pub use config::MigrateConfig;
pub use containment::run_contained;
pub use error::{MigrateError, MigrateResult, StepError, StepPanic, StepResult};
pub use runner::{pending_steps, MigrateReport, MigrationStatus, Migrator};
pub use step::{load_sql_dir, must_execute, Migration, SqlMigration};
pub use store::{DuckDbVersionStore, VersionStore};
