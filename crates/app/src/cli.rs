use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Sift - turn bank statement exports into clean, grouped transactions
#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Bank statement import and merchant clustering", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Import rules (TOML). Built-in Norwegian rules when omitted.
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    /// Field delimiter; overrides the rules file
    #[arg(short, long, global = true)]
    pub delimiter: Option<char>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the header and first rows of a statement
    Preview {
        /// Statement file
        file: PathBuf,

        /// Number of rows to show
        #[arg(short = 'n', long, default_value_t = 5)]
        rows: usize,
    },

    /// Guess which columns hold date, description and amounts
    Detect {
        /// Statement file
        file: PathBuf,
    },

    /// Normalize, filter and group a statement
    Import {
        /// Statement file
        file: PathBuf,

        #[command(flatten)]
        mapping: MappingArgs,
    },
}

/// Explicit column mapping. All four or none.
#[derive(Args, Debug, Default)]
pub struct MappingArgs {
    /// Header of the date column
    #[arg(long, requires_all = ["description", "amount_in", "amount_out"])]
    pub date: Option<String>,

    /// Header of the description column
    #[arg(long, requires_all = ["date", "amount_in", "amount_out"])]
    pub description: Option<String>,

    /// Header of the money-in column
    #[arg(long, requires_all = ["date", "description", "amount_out"])]
    pub amount_in: Option<String>,

    /// Header of the money-out column
    #[arg(long, requires_all = ["date", "description", "amount_in"])]
    pub amount_out: Option<String>,
}
