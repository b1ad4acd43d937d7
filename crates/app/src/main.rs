//! Sift CLI - bank statement import
//!
//! Usage:
//!   sift preview statement.csv          Show header and first rows
//!   sift detect statement.csv           Guess the column mapping
//!   sift import statement.csv           Normalize, filter and group
//!
//! Output is JSON on stdout; logs go to stderr.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use sift_import::StatementImporter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let rules = commands::load_rules(cli.rules.as_deref(), cli.delimiter)?;
    let importer = StatementImporter::new(rules);

    let output = match cli.command {
        Commands::Preview { file, rows } => commands::cmd_preview(&importer, &file, rows)?,
        Commands::Detect { file } => commands::cmd_detect(&importer, &file)?,
        Commands::Import { file, mapping } => commands::cmd_import(&importer, &file, mapping)?,
    };
    println!("{output}");
    Ok(())
}
