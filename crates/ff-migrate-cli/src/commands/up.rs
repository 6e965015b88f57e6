//! Up command implementation

use anyhow::{Context, Result};
use ff_migrate::{pending_steps, Migration, Migrator};

use crate::cli::{GlobalArgs, UpArgs};
use crate::commands::common::load_context;

/// Execute the up command
pub(crate) fn execute(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = load_context(global)?;
    let migrator = Migrator::new(&ctx.config)?;

    if args.dry_run {
        let status = migrator.status(&ctx.conn, &ctx.steps);
        let current = status.current.unwrap_or(0);
        println!("Dry run - would apply {} migration(s):", status.pending());
        for (version, step) in pending_steps(&ctx.steps, current) {
            println!("  v{:03} {}", version, step.name().unwrap_or_default());
        }
        return Ok(());
    }

    let report = migrator.migrate(&ctx.conn, &ctx.steps).with_context(|| {
        format!(
            "Migration from {} stopped",
            ctx.migrations_dir.display()
        )
    })?;

    if report.bootstrapped {
        println!("Created version table {}", migrator.store().table());
    }
    if report.applied == 0 {
        println!("Already up to date at version {}", report.to_version);
    } else {
        println!(
            "Applied {} migration{} (version {} -> {})",
            report.applied,
            if report.applied == 1 { "" } else { "s" },
            report.from_version,
            report.to_version
        );
    }
    Ok(())
}
