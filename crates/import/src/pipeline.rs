use serde::{Deserialize, Serialize};
use sift_core::{DateRange, ImportedTransaction};
use tracing::{debug, trace, warn};

use crate::cluster::{self, PatternGroup};
use crate::detect::{self, ColumnMapping};
use crate::error::ImportError;
use crate::filter;
use crate::normalize::{self, RowRejection};
use crate::reader::{self, RawTable};
use crate::rules::ImportRules;

/// Counts describing what happened to each row of a statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Well-formed data rows in the statement.
    pub rows_read: usize,
    /// Lines dropped by the reader for having the wrong field count.
    pub rows_malformed: usize,
    pub rows_skipped_transfer: usize,
    pub rows_missing_amount: usize,
    pub rows_ambiguous_amount: usize,
    /// Imported transactions whose date is not ISO-8601 after normalization.
    pub dates_unparsed: usize,
    pub imported: usize,
    pub date_range: Option<DateRange>,
}

/// A row that was read but produced no transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRow {
    pub line: usize,
    pub description: String,
    pub reason: RowRejection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// In statement order.
    pub transactions: Vec<ImportedTransaction>,
    pub groups: Vec<PatternGroup>,
    pub rejected: Vec<RejectedRow>,
    pub report: ImportReport,
}

/// Runs a statement through read → detect → normalize → filter/cluster
/// with one set of rules.
#[derive(Debug, Clone)]
pub struct StatementImporter {
    rules: ImportRules,
}

impl Default for StatementImporter {
    fn default() -> Self {
        Self::new(ImportRules::default())
    }
}

impl StatementImporter {
    /// Matching is case-insensitive, so the rules are lowercased here however
    /// they were built.
    pub fn new(rules: ImportRules) -> Self {
        Self {
            rules: rules.normalized(),
        }
    }

    pub fn rules(&self) -> &ImportRules {
        &self.rules
    }

    /// Parse with the ruleset's delimiter.
    pub fn read(&self, text: &str) -> Result<RawTable, ImportError> {
        reader::parse(text, self.rules.delimiter)
    }

    pub fn preview(&self, table: &RawTable, count: usize) -> RawTable {
        reader::preview(table, count)
    }

    pub fn detect(&self, headers: &[String]) -> Option<ColumnMapping> {
        detect::detect(headers, &self.rules.columns)
    }

    /// Convert every row of `table` using `mapping`. Only an unusable mapping
    /// fails; bad rows are counted and reported instead.
    pub fn import(
        &self,
        table: &RawTable,
        mapping: &ColumnMapping,
    ) -> Result<ImportOutcome, ImportError> {
        let cols = mapping.resolve(table)?;
        let mut report = ImportReport {
            rows_read: table.rows.len(),
            rows_malformed: table.dropped_rows,
            ..ImportReport::default()
        };
        let mut transactions = Vec::with_capacity(table.rows.len());
        let mut rejected = Vec::new();

        for row in &table.rows {
            let description = row.get(cols.description);

            if filter::should_skip(description, &self.rules.skip_patterns) {
                trace!(line = row.line, "skipping internal transfer");
                report.rows_skipped_transfer += 1;
                continue;
            }

            let mut tx = match normalize::normalize_row(row, &cols) {
                Ok(tx) => tx,
                Err(reason) => {
                    trace!(line = row.line, %reason, "row not converted");
                    match reason {
                        RowRejection::NoAmount => report.rows_missing_amount += 1,
                        RowRejection::BothAmounts => report.rows_ambiguous_amount += 1,
                    }
                    rejected.push(RejectedRow {
                        line: row.line,
                        description: description.to_string(),
                        reason,
                    });
                    continue;
                }
            };

            if !tx.has_iso_date() {
                warn!(line = row.line, date = %tx.date, "unrecognised date format");
                report.dates_unparsed += 1;
            }

            tx.note = filter::clean_note(description, &self.rules.note_replacements);
            transactions.push(ImportedTransaction::new(row.line, description, tx));
        }

        report.imported = transactions.len();
        report.date_range =
            DateRange::spanning(transactions.iter().filter_map(|t| t.transaction.parsed_date()));

        let groups = cluster::detect_patterns(&transactions, &self.rules.vendor_prefixes);

        debug!(
            read = report.rows_read,
            imported = report.imported,
            transfers = report.rows_skipped_transfer,
            groups = groups.len(),
            "statement imported"
        );

        Ok(ImportOutcome {
            transactions,
            groups,
            rejected,
            report,
        })
    }

    /// Read, auto-detect and import in one go. `Ok(None)` means the columns
    /// could not be detected and the caller has to supply a mapping.
    pub fn import_text(&self, text: &str) -> Result<Option<ImportOutcome>, ImportError> {
        let table = self.read(text)?;
        match self.detect(&table.headers) {
            Some(mapping) => self.import(&table, &mapping).map(Some),
            None => Ok(None),
        }
    }
}
