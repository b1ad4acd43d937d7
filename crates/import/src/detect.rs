use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::ImportError;
use crate::reader::RawTable;
use crate::rules::{ColumnKeywords, Keyword};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Date,
    Description,
    AmountIn,
    AmountOut,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 4] = [
        ColumnRole::Date,
        ColumnRole::Description,
        ColumnRole::AmountIn,
        ColumnRole::AmountOut,
    ];

    fn keywords(self, keywords: &ColumnKeywords) -> &[Keyword] {
        match self {
            ColumnRole::Date => &keywords.date,
            ColumnRole::Description => &keywords.description,
            ColumnRole::AmountIn => &keywords.amount_in,
            ColumnRole::AmountOut => &keywords.amount_out,
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::Date => write!(f, "date"),
            ColumnRole::Description => write!(f, "description"),
            ColumnRole::AmountIn => write!(f, "amount in"),
            ColumnRole::AmountOut => write!(f, "amount out"),
        }
    }
}

/// Which header holds each role. Only usable as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub date: String,
    pub description: String,
    pub amount_in: String,
    pub amount_out: String,
}

/// Column positions for a [`ColumnMapping`] checked against one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub date: usize,
    pub description: usize,
    pub amount_in: usize,
    pub amount_out: usize,
}

impl ColumnMapping {
    pub fn header(&self, role: ColumnRole) -> &str {
        match role {
            ColumnRole::Date => &self.date,
            ColumnRole::Description => &self.description,
            ColumnRole::AmountIn => &self.amount_in,
            ColumnRole::AmountOut => &self.amount_out,
        }
    }

    /// Fails unless all four headers exist in `table` and are distinct.
    pub fn resolve(&self, table: &RawTable) -> Result<ResolvedColumns, ImportError> {
        let mut positions = [0usize; 4];
        for (slot, role) in positions.iter_mut().zip(ColumnRole::ALL) {
            let header = self.header(role);
            *slot = table
                .column(header)
                .ok_or_else(|| ImportError::UnknownColumn(header.to_string()))?;
        }
        if let Some(dup) = first_duplicate(&ColumnRole::ALL.map(|r| self.header(r))) {
            return Err(ImportError::DuplicateColumn(dup.to_string()));
        }

        let [date, description, amount_in, amount_out] = positions;
        Ok(ResolvedColumns {
            date,
            description,
            amount_in,
            amount_out,
        })
    }
}

/// Guess a mapping from header names. Each role goes to the first header
/// (in header order) matching one of its keywords. Returns `None` unless
/// every role was found on a different header; the caller then has to ask
/// the user.
pub fn detect(headers: &[String], keywords: &ColumnKeywords) -> Option<ColumnMapping> {
    let mut found: [Option<&str>; 4] = [None; 4];

    for header in headers {
        let lower = header.to_lowercase();
        for (slot, role) in found.iter_mut().zip(ColumnRole::ALL) {
            if slot.is_none() && role.keywords(keywords).iter().any(|k| k.matches(&lower)) {
                *slot = Some(header.as_str());
            }
        }
    }

    let [Some(date), Some(description), Some(amount_in), Some(amount_out)] = found else {
        let missing: Vec<String> = ColumnRole::ALL
            .iter()
            .zip(found)
            .filter(|(_, h)| h.is_none())
            .map(|(r, _)| r.to_string())
            .collect();
        debug!(?missing, "column mapping not detected");
        return None;
    };

    if let Some(dup) = first_duplicate(&[date, description, amount_in, amount_out]) {
        debug!(header = dup, "column mapping not detected: header claimed by two roles");
        return None;
    }

    Some(ColumnMapping {
        date: date.to_string(),
        description: description.to_string(),
        amount_in: amount_in.to_string(),
        amount_out: amount_out.to_string(),
    })
}

fn first_duplicate<'a>(headers: &[&'a str]) -> Option<&'a str> {
    headers
        .iter()
        .enumerate()
        .find(|(i, h)| headers[..*i].contains(h))
        .map(|(_, h)| *h)
}
