use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Statement is empty")]
    EmptyInput,
    #[error("Delimiter must be a single ASCII character, got {0:?}")]
    UnsupportedDelimiter(char),
    #[error("Column not found in statement: {0}")]
    UnknownColumn(String),
    #[error("Column {0} is mapped to more than one role")]
    DuplicateColumn(String),
    #[error("Invalid import rules: {0}")]
    Rules(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
