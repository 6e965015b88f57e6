//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// Apply ordered SQL migrations to a DuckDB database
#[derive(Parser, Debug)]
#[command(name = "ff-migrate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// DuckDB database file, or `:memory:`
    #[arg(short, long, global = true, env = "FF_MIGRATE_DATABASE")]
    pub database: Option<String>,

    /// Migration config file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory of `*.sql` migrations (overrides `migrations_path`)
    #[arg(long, global = true)]
    pub dir: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply all pending migrations
    Up(UpArgs),

    /// Show the recorded schema version and pending migrations
    Status(StatusArgs),
}

/// Arguments for the up command
#[derive(Args, Debug)]
pub struct UpArgs {
    /// List pending migrations without applying them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// List each migration with its applied/pending state
    #[arg(short, long)]
    pub list: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
