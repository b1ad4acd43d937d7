pub mod cluster;
pub mod detect;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod pipeline;
pub mod reader;
pub mod rules;

pub use cluster::{detect_patterns, extract_pattern, PatternGroup};
pub use detect::{ColumnMapping, ColumnRole, ResolvedColumns};
pub use error::ImportError;
pub use normalize::{normalize_date, parse_amount, RowRejection};
pub use pipeline::{ImportOutcome, ImportReport, RejectedRow, StatementImporter};
pub use reader::{RawRow, RawTable};
pub use rules::{ColumnKeywords, ImportRules, Keyword, NoteReplacement};

pub mod import {
    use crate::*;

    pub fn parse_statement(text: &str, delimiter: char) -> Result<RawTable, ImportError> {
        crate::reader::parse(text, delimiter)
    }

    pub fn detect_columns(headers: &[String], rules: &ImportRules) -> Option<ColumnMapping> {
        crate::detect::detect(headers, &rules.columns)
    }

    pub fn import_statement(
        table: &RawTable,
        mapping: &ColumnMapping,
        rules: ImportRules,
    ) -> Result<ImportOutcome, ImportError> {
        StatementImporter::new(rules).import(table, mapping)
    }
}
