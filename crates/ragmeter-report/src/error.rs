//! Error types for ragmeter-report.

/// Errors that can occur while aggregating or exporting reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// IO error reading inputs or writing report files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report text assembly failed.
    #[error("format error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Statistics requested over zero chunk records.
    #[error("cannot compute statistics over an empty corpus")]
    EmptyCorpus,

    /// YAML serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias using `ReportError`.
pub type Result<T> = std::result::Result<T, ReportError>;
