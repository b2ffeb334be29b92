use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("rule error: {0}")]
    Rules(#[from] RuleError),
    /// The input or output artifact could not be read or written.
    #[error(transparent)]
    Artifact(#[from] std::io::Error),
    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// A rewrite table entry that cannot be turned into a stage.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("'{0}' is not a valid identifier")]
    InvalidIdentifier(String),
    #[error("lookup code '{code}' for '{function}' is not a decimal integer")]
    InvalidCode { function: String, code: String },
    #[error("duplicate code {code} for string table function '{function}'")]
    DuplicateCode { function: String, code: u64 },
    #[error("regex compile error: {0}")]
    Regex(#[from] regex::Error),
}
