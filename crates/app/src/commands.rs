use anyhow::{bail, Context, Result};
use sift_import::{ColumnMapping, ImportOutcome, ImportRules, RawTable, StatementImporter};
use std::path::Path;
use tracing::info;

use crate::cli::MappingArgs;

pub fn load_rules(path: Option<&Path>, delimiter: Option<char>) -> Result<ImportRules> {
    let mut rules = match path {
        Some(path) => ImportRules::from_path(path)
            .with_context(|| format!("Failed to load rules from {}", path.display()))?,
        None => ImportRules::default(),
    };
    if let Some(delimiter) = delimiter {
        rules.delimiter = delimiter;
    }
    Ok(rules)
}

/// Statements are expected to be UTF-8.
fn read_statement(importer: &StatementImporter, file: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let table = importer
        .read(&text)
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    if table.dropped_rows > 0 {
        info!(dropped = table.dropped_rows, "Skipped malformed rows");
    }
    Ok(table)
}

pub fn cmd_preview(importer: &StatementImporter, file: &Path, rows: usize) -> Result<String> {
    let table = read_statement(importer, file)?;
    let sample = importer.preview(&table, rows);
    Ok(serde_json::to_string_pretty(&sample)?)
}

pub fn cmd_detect(importer: &StatementImporter, file: &Path) -> Result<String> {
    let table = read_statement(importer, file)?;
    match importer.detect(&table.headers) {
        Some(mapping) => Ok(serde_json::to_string_pretty(&mapping)?),
        None => bail!(
            "No column mapping detected in headers {:?}; pass --date/--description/--amount-in/--amount-out",
            table.headers
        ),
    }
}

pub fn cmd_import(
    importer: &StatementImporter,
    file: &Path,
    mapping: MappingArgs,
) -> Result<String> {
    let table = read_statement(importer, file)?;
    let mapping = match explicit_mapping(mapping) {
        Some(mapping) => mapping,
        None => importer.detect(&table.headers).with_context(|| {
            format!(
                "No column mapping detected in headers {:?}; pass --date/--description/--amount-in/--amount-out",
                table.headers
            )
        })?,
    };

    let outcome = importer.import(&table, &mapping)?;
    log_report(&outcome);
    Ok(serde_json::to_string_pretty(&outcome)?)
}

fn explicit_mapping(args: MappingArgs) -> Option<ColumnMapping> {
    Some(ColumnMapping {
        date: args.date?,
        description: args.description?,
        amount_in: args.amount_in?,
        amount_out: args.amount_out?,
    })
}

fn log_report(outcome: &ImportOutcome) {
    let r = &outcome.report;
    info!(
        read = r.rows_read,
        malformed = r.rows_malformed,
        transfers = r.rows_skipped_transfer,
        missing_amount = r.rows_missing_amount,
        ambiguous_amount = r.rows_ambiguous_amount,
        bad_dates = r.dates_unparsed,
        imported = r.imported,
        groups = outcome.groups.len(),
        "Import finished"
    );
    if let Some(range) = r.date_range {
        info!("Statement covers {range}");
    }
}
