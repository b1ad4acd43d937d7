use regex::Regex;
use serde::{Deserialize, Serialize};
use sift_core::{ImportedTransaction, Money, TransactionId, TransactionKind};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Groups smaller than this are not worth a bulk decision.
pub const MIN_GROUP_SIZE: usize = 2;
/// Example descriptions kept per group.
pub const MAX_EXAMPLES: usize = 3;

fn re_separators() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"[\s\-_.,;]+").expect("invalid regex"))
}

/// Transactions sharing a pattern and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternGroup {
    pub pattern: String,
    pub count: usize,
    /// Income adds, expenses subtract.
    pub total_amount: Money,
    pub descriptions: Vec<String>,
    pub transaction_ids: Vec<TransactionId>,
    pub is_income: bool,
}

/// Pull a merchant-like token out of a description.
///
/// After lower-casing and stripping a known payment-processor prefix, the
/// first separator-delimited token of at least three characters that is not
/// all digits wins. Otherwise the first word, otherwise the whole string.
pub fn extract_pattern(description: &str, vendor_prefixes: &[String]) -> String {
    let lower = description.to_lowercase();
    let lower = lower.trim();
    let cleaned = vendor_prefixes
        .iter()
        .find_map(|p| lower.strip_prefix(p.as_str()))
        .unwrap_or(lower)
        .trim();

    let token = re_separators()
        .split(cleaned)
        .find(|part| part.chars().count() >= 3 && !part.chars().all(|c| c.is_ascii_digit()));

    match token {
        Some(token) => token.to_string(),
        None => cleaned
            .split_whitespace()
            .next()
            .unwrap_or(cleaned)
            .to_string(),
    }
}

/// Cluster transactions by extracted pattern and direction.
///
/// Groups with fewer than [`MIN_GROUP_SIZE`] members are dropped. The rest
/// are ordered by size, largest first; equal sizes keep the order in which
/// their first member appeared.
pub fn detect_patterns(
    transactions: &[ImportedTransaction],
    vendor_prefixes: &[String],
) -> Vec<PatternGroup> {
    let mut groups: Vec<PatternGroup> = Vec::new();
    let mut index: HashMap<(String, TransactionKind), usize> = HashMap::new();

    for imported in transactions {
        let tx = &imported.transaction;
        let pattern = extract_pattern(&tx.note, vendor_prefixes);

        let slot = *index.entry((pattern.clone(), tx.kind)).or_insert_with(|| {
            groups.push(PatternGroup {
                pattern,
                count: 0,
                total_amount: Money::zero(),
                descriptions: Vec::new(),
                transaction_ids: Vec::new(),
                is_income: tx.kind.is_income(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.count += 1;
        group.total_amount = group.total_amount + tx.signed_amount();
        group.transaction_ids.push(imported.id.clone());
        if group.descriptions.len() < MAX_EXAMPLES && !group.descriptions.contains(&tx.note) {
            group.descriptions.push(tx.note.clone());
        }
    }

    groups.retain(|g| g.count >= MIN_GROUP_SIZE);
    // Stable: ties stay in first-seen order.
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}
