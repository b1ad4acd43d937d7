use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn is_income(self) -> bool {
        matches!(self, TransactionKind::Income)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Expense => write!(f, "expense"),
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("Unknown transaction kind: '{other}'")),
        }
    }
}

/// Stable identifier for an imported transaction, derived from its source row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl TransactionId {
    /// Hex prefix of SHA-256 over the row's line number and content. Two
    /// identical rows on different lines get different ids.
    pub fn derive(line: usize, tx: &NormalizedTransaction, description: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((line as u64).to_be_bytes());
        hasher.update(tx.date.as_bytes());
        hasher.update([0u8]);
        hasher.update(tx.amount.as_decimal().normalize().to_string().as_bytes());
        hasher.update([0u8]);
        hasher.update(tx.kind.to_string().as_bytes());
        hasher.update([0u8]);
        hasher.update(description.as_bytes());
        let hash: [u8; 32] = hasher.finalize().into();
        TransactionId(hash[..8].iter().map(|b| format!("{b:02x}")).collect())
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One bank-statement row after normalization. `amount` is always a
/// magnitude; direction lives in `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    /// `YYYY-MM-DD` when the source date was recognised, otherwise the raw text.
    pub date: String,
    pub amount: Money,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub note: String,
}

impl NormalizedTransaction {
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    pub fn has_iso_date(&self) -> bool {
        self.parsed_date().is_some()
    }
}

/// A normalized transaction with its source row, as handed to the
/// clusterer and then to the transaction store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedTransaction {
    pub id: TransactionId,
    /// 1-based line in the statement.
    pub line: usize,
    /// Description as exported by the bank, before note cleaning.
    pub description: String,
    #[serde(flatten)]
    pub transaction: NormalizedTransaction,
}

impl ImportedTransaction {
    pub fn new(line: usize, description: &str, transaction: NormalizedTransaction) -> Self {
        ImportedTransaction {
            id: TransactionId::derive(line, &transaction, description),
            line,
            description: description.to_string(),
            transaction,
        }
    }
}
