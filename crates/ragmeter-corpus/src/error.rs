//! Error types for ragmeter-corpus.

/// Errors that can occur while loading or reconstructing the corpus.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// IO error reading corpus files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Chunk store error.
    #[error("store error: {0}")]
    Store(#[from] crate::store::StoreError),

    /// Chunk metadata payload could not be decoded.
    #[error("malformed metadata for chunk '{id}': {source}")]
    Metadata {
        id: String,
        source: serde_json::Error,
    },

    /// Tokenizer could not be loaded or failed to encode.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),
}

/// Result type alias using `CorpusError`.
pub type Result<T> = std::result::Result<T, CorpusError>;
