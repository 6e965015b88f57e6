//! The apply loop.
//!
//! [`Migrator::migrate`] reads the stored version (bootstrapping the tracking
//! table when it cannot be read), then applies every step whose 1-based
//! position is greater than that version, strictly in order. The version is
//! written after each step succeeds; the first failure stops the run.

use crate::config::MigrateConfig;
use crate::containment::run_contained;
use crate::error::{MigrateError, MigrateResult};
use crate::step::Migration;
use crate::store::{DuckDbVersionStore, VersionStore};
use duckdb::Connection;

/// Summary of a successful [`Migrator::migrate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrateReport {
    /// Version read at the start of the run (0 after a bootstrap)
    pub from_version: u32,
    /// Version recorded at the end of the run
    pub to_version: u32,
    /// Number of steps applied in this run
    pub applied: u32,
    /// Whether the tracking table was created by this run
    pub bootstrapped: bool,
}

/// Read-only view of where a database stands relative to a step list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Stored version, `None` if it could not be read
    pub current: Option<u32>,
    /// Version reached once every supplied step is applied
    pub latest: u32,
}

impl MigrationStatus {
    /// Number of steps a `migrate` call would apply.
    pub fn pending(&self) -> u32 {
        self.latest.saturating_sub(self.current.unwrap_or(0))
    }

    pub fn is_up_to_date(&self) -> bool {
        self.current.is_some() && self.pending() == 0
    }
}

/// Steps whose target version is greater than `current`, in ascending order.
///
/// The target version of a step is its 1-based position in `steps`.
pub fn pending_steps<'a, M>(steps: &'a [M], current: u32) -> impl Iterator<Item = (u32, &'a M)> {
    (1..=u32::MAX)
        .zip(steps)
        .filter(move |(version, _)| *version > current)
}

fn latest_version<M>(steps: &[M]) -> u32 {
    u32::try_from(steps.len()).unwrap_or(u32::MAX)
}

/// Sequential migration runner.
///
/// Single-threaded and blocking; it takes no lock on the database, so only
/// one runner may target a database at a time.
#[derive(Debug, Clone, Default)]
pub struct Migrator<S = DuckDbVersionStore> {
    store: S,
}

impl Migrator<DuckDbVersionStore> {
    /// Runner tracking versions in the table named by `config`
    pub fn new(config: &MigrateConfig) -> MigrateResult<Self> {
        Ok(Self::with_store(DuckDbVersionStore::new(config)?))
    }
}

impl<S: VersionStore> Migrator<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply every pending step in `steps` to `conn`.
    ///
    /// On error the stored version is left at the last step that both ran
    /// and was recorded. [`MigrateError::Step`] means the failing step's
    /// effects were not credited; [`MigrateError::VersionWrite`] means the
    /// step ran but was not recorded and will run again next time.
    pub fn migrate<M: Migration>(
        &self,
        conn: &Connection,
        steps: &[M],
    ) -> MigrateResult<MigrateReport> {
        let (initial, bootstrapped) = match self.store.read(conn) {
            Some(version) => (version, false),
            None => {
                self.store.bootstrap(conn)?;
                (0, true)
            }
        };

        let latest = latest_version(steps);
        if initial > latest {
            log::warn!(
                "Database is at schema version {} but only {} migrations are known",
                initial,
                latest
            );
        }

        let mut current = initial;
        for (version, step) in pending_steps(steps, initial) {
            match step.name() {
                Some(name) => log::debug!("Applying migration v{:03} ({})", version, name),
                None => log::debug!("Applying migration v{:03}", version),
            }

            if let Err(source) = run_contained(step, conn) {
                log::error!("Migration v{:03} failed: {}", version, source);
                return Err(MigrateError::Step { version, source });
            }

            if let Err(e) = self.store.write(conn, version) {
                log::error!(
                    "Migration v{:03} was applied but not recorded: {}",
                    version,
                    e
                );
                return Err(e);
            }
            current = version;
        }

        let report = MigrateReport {
            from_version: initial,
            to_version: current,
            applied: current - initial,
            bootstrapped,
        };
        if report.applied > 0 {
            log::info!(
                "Migrated schema from version {} to {}",
                report.from_version,
                report.to_version
            );
        } else {
            log::info!("Schema is up to date at version {}", current);
        }
        Ok(report)
    }

    /// Report the stored version against `steps` without changing anything.
    pub fn status<M>(&self, conn: &Connection, steps: &[M]) -> MigrationStatus {
        MigrationStatus {
            current: self.store.read(conn),
            latest: latest_version(steps),
        }
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
