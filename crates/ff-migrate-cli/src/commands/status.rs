//! Status command implementation

use anyhow::Result;
use ff_migrate::{Migration, Migrator};

use crate::cli::{GlobalArgs, StatusArgs};
use crate::commands::common::load_context;

/// Execute the status command
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = load_context(global)?;
    let migrator = Migrator::new(&ctx.config)?;
    let status = migrator.status(&ctx.conn, &ctx.steps);

    match status.current {
        Some(version) => println!("Current version: {}", version),
        None => println!("Current version: not initialized"),
    }
    println!("Latest version:  {}", status.latest);
    println!("Pending:         {}", status.pending());

    if args.list {
        let current = status.current.unwrap_or(0);
        println!();
        for (version, step) in (1u32..).zip(&ctx.steps) {
            let state = if version <= current { "applied" } else { "pending" };
            println!(
                "  v{:03} {:<8} {}",
                version,
                state,
                step.name().unwrap_or_default()
            );
        }
    }
    Ok(())
}
