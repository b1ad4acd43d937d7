use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ImportError;

/// A header keyword. `term` must occur in the lower-cased header and none of
/// `unless` may.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unless: Vec<String>,
}

impl Keyword {
    pub fn new(term: &str) -> Self {
        Keyword {
            term: term.to_string(),
            unless: Vec::new(),
        }
    }

    pub fn unless(term: &str, excluded: &[&str]) -> Self {
        Keyword {
            term: term.to_string(),
            unless: excluded.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// `header` must already be lower-cased.
    pub fn matches(&self, header: &str) -> bool {
        header.contains(&self.term) && !self.unless.iter().any(|u| header.contains(u))
    }

    fn lowercased(self) -> Self {
        Keyword {
            term: self.term.to_lowercase(),
            unless: self.unless.into_iter().map(|u| u.to_lowercase()).collect(),
        }
    }
}

/// Keyword sets used to guess which header plays which role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnKeywords {
    pub date: Vec<Keyword>,
    pub description: Vec<Keyword>,
    pub amount_in: Vec<Keyword>,
    pub amount_out: Vec<Keyword>,
}

impl Default for ColumnKeywords {
    fn default() -> Self {
        Self {
            date: vec![Keyword::new("dato"), Keyword::new("date")],
            description: vec![
                Keyword::new("beskrivelse"),
                Keyword::new("description"),
                Keyword::new("tekst"),
            ],
            amount_in: vec![
                Keyword::new("inn"),
                Keyword::new("credit"),
                Keyword::new("innskudd"),
            ],
            // "utført" (executed) is a date column in Norwegian exports.
            amount_out: vec![
                Keyword::unless("ut", &["utført"]),
                Keyword::new("debit"),
                Keyword::new("uttak"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteReplacement {
    pub pattern: String,
    pub replacement: String,
}

impl NoteReplacement {
    pub fn new(pattern: &str, replacement: &str) -> Self {
        NoteReplacement {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

/// Everything bank- or locale-specific about an import. The default ruleset
/// is tuned for Handelsbanken's Norwegian export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportRules {
    pub delimiter: char,
    /// Descriptions containing any of these are internal transfers.
    pub skip_patterns: Vec<String>,
    /// Checked in order; the first hit replaces the whole note.
    pub note_replacements: Vec<NoteReplacement>,
    /// Payment-processor prefixes stripped before pattern extraction.
    pub vendor_prefixes: Vec<String>,
    pub columns: ColumnKeywords,
}

impl Default for ImportRules {
    fn default() -> Self {
        Self {
            delimiter: ';',
            skip_patterns: [
                "overføring fra sparekonto",
                "overføring til sparekonto",
                "overføring fra brukskonto",
                "overføring til brukskonto",
                "overføring fra faste",
                "overføring til faste",
                "peder hanch-hansen espen",
                "til konto: 9053 08 39558",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            note_replacements: vec![
                NoteReplacement::new("til konto: 9053 71 05460", "Boliglån"),
                NoteReplacement::new("til konto: 6122 06 30691", "Kron"),
            ],
            vendor_prefixes: vec![
                "vipps*".to_string(),
                "zettle_*".to_string(),
                "paypal *".to_string(),
            ],
            columns: ColumnKeywords::default(),
        }
    }
}

impl ImportRules {
    /// An empty ruleset: nothing skipped, nothing rewritten, no prefixes and
    /// no column keywords. Useful as a base for programmatic rules.
    pub fn empty() -> Self {
        Self {
            delimiter: ';',
            skip_patterns: Vec::new(),
            note_replacements: Vec::new(),
            vendor_prefixes: Vec::new(),
            columns: ColumnKeywords {
                date: Vec::new(),
                description: Vec::new(),
                amount_in: Vec::new(),
                amount_out: Vec::new(),
            },
        }
    }

    /// Parse rules from TOML. Sections left out keep their defaults.
    pub fn from_toml(toml_content: &str) -> Result<Self, ImportError> {
        let rules: ImportRules = toml::from_str(toml_content)?;
        Ok(rules.normalized())
    }

    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Lower-case every pattern so matching can compare against a
    /// lower-cased description.
    pub fn normalized(self) -> Self {
        let lower = |v: Vec<String>| -> Vec<String> { v.into_iter().map(|s| s.to_lowercase()).collect() };
        let keywords =
            |v: Vec<Keyword>| -> Vec<Keyword> { v.into_iter().map(Keyword::lowercased).collect() };
        Self {
            delimiter: self.delimiter,
            skip_patterns: lower(self.skip_patterns),
            note_replacements: self
                .note_replacements
                .into_iter()
                .map(|r| NoteReplacement {
                    pattern: r.pattern.to_lowercase(),
                    replacement: r.replacement,
                })
                .collect(),
            vendor_prefixes: lower(self.vendor_prefixes),
            columns: ColumnKeywords {
                date: keywords(self.columns.date),
                description: keywords(self.columns.description),
                amount_in: keywords(self.columns.amount_in),
                amount_out: keywords(self.columns.amount_out),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_exclusion() {
        let kw = Keyword::unless("ut", &["utført"]);
        assert!(kw.matches("ut"));
        assert!(kw.matches("beløp ut"));
        assert!(!kw.matches("utført dato"));
        assert!(!kw.matches("inn"));
    }

    #[test]
    fn default_rules_are_already_normalized() {
        let rules = ImportRules::default();
        assert_eq!(rules.clone().normalized(), rules);
    }

    #[test]
    fn bundled_rules_file_matches_defaults() {
        let rules = ImportRules::from_toml(include_str!("../rules/default.toml")).unwrap();
        assert_eq!(rules, ImportRules::default());
    }

    #[test]
    fn from_toml_keeps_defaults_for_missing_sections() {
        let rules = ImportRules::from_toml(
            r#"
            delimiter = ","
            skip_patterns = ["Transfer To Savings"]
            "#,
        )
        .unwrap();
        assert_eq!(rules.delimiter, ',');
        assert_eq!(rules.skip_patterns, vec!["transfer to savings".to_string()]);
        assert_eq!(rules.note_replacements, ImportRules::default().note_replacements);
        assert_eq!(rules.columns, ColumnKeywords::default());
    }

    #[test]
    fn from_toml_lowercases_patterns_but_not_replacements() {
        let rules = ImportRules::from_toml(
            r#"
            vendor_prefixes = ["SQ *"]

            [[note_replacements]]
            pattern = "ACH RENT"
            replacement = "Rent"

            [columns]
            amount_out = [{ term = "OUT", unless = ["OUTSTANDING"] }]
            "#,
        )
        .unwrap();
        assert_eq!(rules.vendor_prefixes, vec!["sq *".to_string()]);
        assert_eq!(rules.note_replacements, vec![NoteReplacement::new("ach rent", "Rent")]);
        assert_eq!(rules.columns.amount_out, vec![Keyword::unless("out", &["outstanding"])]);
        // Untouched role keeps its default keywords.
        assert_eq!(rules.columns.date, ColumnKeywords::default().date);
    }

    #[test]
    fn from_toml_rejects_bad_input() {
        assert!(matches!(
            ImportRules::from_toml("skip_patterns = 5"),
            Err(ImportError::Rules(_))
        ));
        assert!(ImportRules::from_toml("delimiter = \";;\"").is_err());
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(&path, "delimiter = \"\\t\"\n").unwrap();
        let rules = ImportRules::from_path(&path).unwrap();
        assert_eq!(rules.delimiter, '\t');
    }

    #[test]
    fn from_path_missing_file_is_io_error() {
        let result = ImportRules::from_path(Path::new("/nonexistent/sift-rules.toml"));
        assert!(matches!(result, Err(ImportError::Io(_))));
    }
}
