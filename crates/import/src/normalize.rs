use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sift_core::{Money, NormalizedTransaction, TransactionKind};
use std::str::FromStr;
use thiserror::Error;

use crate::detect::ResolvedColumns;
use crate::reader::RawRow;

/// Why a row produced no transaction. These are not failures of the import;
/// the caller decides whether to drop or flag the row.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowRejection {
    #[error("no usable amount in either the in or the out column")]
    NoAmount,
    #[error("usable amounts in both the in and the out column")]
    BothAmounts,
}

/// Reformat `DD.MM.YYYY` as `YYYY-MM-DD`, zero-padding day and month.
/// Anything that does not split into exactly three dot-separated parts comes
/// back unchanged.
pub fn normalize_date(date: &str) -> String {
    let parts: Vec<&str> = date.split('.').collect();
    match parts.as_slice() {
        [day, month, year] => format!("{year}-{month:0>2}-{day:0>2}"),
        _ => date.to_string(),
    }
}

/// Parse a locale-formatted amount as a magnitude.
///
/// Whitespace is removed (thousands separators), the first comma becomes the
/// decimal point and a leading minus is dropped. Empty or unparseable input
/// yields `None`.
pub fn parse_amount(amount: &str) -> Option<Money> {
    let compact: String = amount.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    let compact = compact.replacen(',', ".", 1);
    let unsigned = compact.strip_prefix('-').unwrap_or(&compact);

    let value = Decimal::from_str(unsigned).ok()?;
    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }
    Some(Money::from_decimal(value.abs()))
}

/// Turn one raw row into a transaction. The in column makes it income, the
/// out column an expense; exactly one of them must hold a nonzero amount.
/// The note is the raw description; cleaning happens later.
pub fn normalize_row(
    row: &RawRow,
    cols: &ResolvedColumns,
) -> Result<NormalizedTransaction, RowRejection> {
    let usable = |index: usize| parse_amount(row.get(index)).filter(|m| !m.is_zero());

    let (amount, kind) = match (usable(cols.amount_in), usable(cols.amount_out)) {
        (Some(amount), None) => (amount, TransactionKind::Income),
        (None, Some(amount)) => (amount, TransactionKind::Expense),
        (None, None) => return Err(RowRejection::NoAmount),
        (Some(_), Some(_)) => return Err(RowRejection::BothAmounts),
    };

    Ok(NormalizedTransaction {
        date: normalize_date(row.get(cols.date)),
        amount,
        kind,
        note: row.get(cols.description).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── normalize_date ────────────────────────────────────────────────────────

    #[test]
    fn date_dotted_to_iso() {
        assert_eq!(normalize_date("05.03.2024"), "2024-03-05");
    }

    #[test]
    fn date_pads_day_and_month() {
        assert_eq!(normalize_date("5.3.2024"), "2024-03-05");
    }

    #[test]
    fn date_other_formats_unchanged() {
        assert_eq!(normalize_date("2024/03/05"), "2024/03/05");
        assert_eq!(normalize_date("2024-03-05"), "2024-03-05");
        assert_eq!(normalize_date("05.03"), "05.03");
        assert_eq!(normalize_date("1.2.3.4"), "1.2.3.4");
        assert_eq!(normalize_date(""), "");
    }

    // ── parse_amount ──────────────────────────────────────────────────────────

    fn money(s: &str) -> Money {
        Money::from_decimal(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn amount_with_thousands_space_and_decimal_comma() {
        assert_eq!(parse_amount("1 234,56"), Some(money("1234.56")));
    }

    #[test]
    fn amount_with_non_breaking_space() {
        assert_eq!(parse_amount("12\u{a0}500,00"), Some(money("12500.00")));
    }

    #[test]
    fn amount_sign_is_stripped() {
        assert_eq!(parse_amount("-50,00"), Some(money("50.00")));
        assert_eq!(parse_amount(" -0,50 "), Some(money("0.50")));
    }

    #[test]
    fn amount_plain_numbers() {
        assert_eq!(parse_amount("45"), Some(money("45")));
        assert_eq!(parse_amount("45.10"), Some(money("45.10")));
        assert_eq!(parse_amount("0,00"), Some(Money::zero()));
    }

    #[test]
    fn amount_empty_is_none() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
    }

    #[test]
    fn amount_garbage_is_none() {
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("-"), None);
        assert_eq!(parse_amount("12abc"), None);
        // Dotted thousands would otherwise be misread.
        assert_eq!(parse_amount("1.234,56"), None);
        assert_eq!(parse_amount("--5"), None);
    }

    // ── normalize_row ─────────────────────────────────────────────────────────

    const COLS: ResolvedColumns = ResolvedColumns {
        date: 0,
        description: 1,
        amount_in: 2,
        amount_out: 3,
    };

    fn row(fields: [&str; 4]) -> RawRow {
        RawRow {
            line: 2,
            fields: fields.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn row_with_out_amount_is_expense() {
        let tx = normalize_row(&row(["01.01.2024", "Kaffe", "", "45,00"]), &COLS).unwrap();
        assert_eq!(
            tx,
            NormalizedTransaction {
                date: "2024-01-01".into(),
                amount: money("45.00"),
                kind: TransactionKind::Expense,
                note: "Kaffe".into(),
            }
        );
    }

    #[test]
    fn row_with_in_amount_is_income() {
        let tx = normalize_row(&row(["25.01.2024", "Lønn", "32 000,00", ""]), &COLS).unwrap();
        assert_eq!(tx.kind, TransactionKind::Income);
        assert_eq!(tx.amount, money("32000"));
    }

    #[test]
    fn row_zero_in_other_column_is_ignored() {
        let tx = normalize_row(&row(["01.01.2024", "Kaffe", "0,00", "-45,00"]), &COLS).unwrap();
        assert_eq!(tx.kind, TransactionKind::Expense);
        assert_eq!(tx.amount, money("45"));
    }

    #[test]
    fn row_without_amount_is_rejected() {
        assert_eq!(
            normalize_row(&row(["01.01.2024", "Kaffe", "", ""]), &COLS),
            Err(RowRejection::NoAmount)
        );
        assert_eq!(
            normalize_row(&row(["01.01.2024", "Kaffe", "n/a", "0"]), &COLS),
            Err(RowRejection::NoAmount)
        );
    }

    #[test]
    fn row_with_both_amounts_is_rejected() {
        assert_eq!(
            normalize_row(&row(["01.01.2024", "Kaffe", "10,00", "45,00"]), &COLS),
            Err(RowRejection::BothAmounts)
        );
    }

    #[test]
    fn row_keeps_unparseable_date() {
        let tx = normalize_row(&row(["2024/01/01", "Kaffe", "", "45"]), &COLS).unwrap();
        assert_eq!(tx.date, "2024/01/01");
        assert!(!tx.has_iso_date());
    }
}
