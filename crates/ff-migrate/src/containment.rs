//! Failure containment around a single step.
//!
//! A panicking step must not unwind through the apply loop. Panics are caught
//! here and turned into ordinary step errors, so the runner only ever sees a
//! `StepResult`.

use crate::error::{MigrateError, StepError, StepPanic, StepResult};
use crate::step::Migration;
use duckdb::Connection;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Run `step` against `conn`, converting a panic into an error.
pub fn run_contained<M: Migration + ?Sized>(step: &M, conn: &Connection) -> StepResult {
    match panic::catch_unwind(AssertUnwindSafe(|| step.apply(conn))) {
        Ok(outcome) => outcome,
        Err(payload) => Err(error_from_panic(payload)),
    }
}

/// Recover an error from a panic payload.
///
/// Error payloads (as raised by `panic_any`) are returned as-is; string
/// payloads are wrapped in [`StepPanic`].
fn error_from_panic(payload: Box<dyn Any + Send>) -> StepError {
    let payload = match payload.downcast::<StepError>() {
        Ok(err) => return *err,
        Err(other) => other,
    };
    let payload = match payload.downcast::<duckdb::Error>() {
        Ok(err) => return err,
        Err(other) => other,
    };
    let payload = match payload.downcast::<MigrateError>() {
        Ok(err) => return err,
        Err(other) => other,
    };

    let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    };
    Box::new(StepPanic { message })
}

#[cfg(test)]
#[path = "containment_test.rs"]
mod tests;
