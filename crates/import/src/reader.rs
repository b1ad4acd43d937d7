use csv::StringRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::ImportError;

/// One data line. `fields` is aligned with the table's `headers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// 1-based line number in the source text.
    pub line: usize,
    pub fields: Vec<String>,
}

impl RawRow {
    pub fn get(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or_default()
    }
}

/// A delimited statement split into a header and same-width rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    /// Rows in the full statement, unaffected by [`preview`].
    pub total_rows: usize,
    /// Lines whose field count did not match the header.
    pub dropped_rows: usize,
}

impl RawTable {
    /// Position of the first header with this name.
    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    pub fn value<'a>(&self, row: &'a RawRow, header: &str) -> Option<&'a str> {
        self.column(header).map(|i| row.get(i))
    }
}

/// Split `text` into a header and data rows.
///
/// Blank lines are ignored. Each field is trimmed and loses one leading and
/// one trailing double quote. Quoted delimiters are not supported: the reader
/// splits on every occurrence of `delimiter`. Lines end at `\n`, `\r\n` or a
/// lone `\r`, so a bare carriage return inside a field splits the row. Rows
/// whose width differs from the header are dropped and counted.
pub fn parse(text: &str, delimiter: char) -> Result<RawTable, ImportError> {
    let delimiter_byte = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(ImportError::UnsupportedDelimiter(delimiter))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .delimiter(delimiter_byte)
        .from_reader(text.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    let mut dropped_rows = 0;

    // Unquoted UTF-8 from memory: the reader has no error to report.
    for record in reader.records().filter_map(Result::ok) {
        if is_blank(&record, delimiter) {
            continue;
        }

        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or_default();
        let fields: Vec<String> = record.iter().map(clean_field).collect();

        match headers.as_ref().map(Vec::len) {
            None => headers = Some(fields),
            Some(width) if width != fields.len() => {
                trace!(line, expected = width, found = fields.len(), "dropping malformed row");
                dropped_rows += 1;
            }
            Some(_) => rows.push(RawRow { line, fields }),
        }
    }

    let headers = headers.ok_or(ImportError::EmptyInput)?;
    debug!(
        columns = headers.len(),
        rows = rows.len(),
        dropped = dropped_rows,
        "parsed statement"
    );

    Ok(RawTable {
        headers,
        total_rows: rows.len(),
        rows,
        dropped_rows,
    })
}

/// The first `count` rows of `table`, for showing a sample before the user
/// confirms a column mapping.
pub fn preview(table: &RawTable, count: usize) -> RawTable {
    RawTable {
        headers: table.headers.clone(),
        rows: table.rows.iter().take(count).cloned().collect(),
        total_rows: table.total_rows,
        dropped_rows: table.dropped_rows,
    }
}

/// A line that is empty once trimmed. With a whitespace delimiter such a
/// line can still split into several empty fields.
fn is_blank(record: &StringRecord, delimiter: char) -> bool {
    (record.len() <= 1 || delimiter.is_whitespace()) && record.iter().all(|f| f.trim().is_empty())
}

fn clean_field(field: &str) -> String {
    let field = field.trim();
    let field = field.strip_prefix('"').unwrap_or(field);
    let field = field.strip_suffix('"').unwrap_or(field);
    field.to_string()
}
