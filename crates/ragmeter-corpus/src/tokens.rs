//! Token counting behind a trait seam.

use std::path::Path;

use tokenizers::Tokenizer;

use crate::error::{CorpusError, Result};

/// Counts tokens for a text under a fixed encoding.
pub trait TokenCounter: Send + Sync {
    /// Number of tokens in `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    fn count(&self, text: &str) -> Result<u64>;
}

/// [`TokenCounter`] backed by a HuggingFace `tokenizers` encoding file.
///
/// The file must be the one persisted by the upstream embedding
/// pipeline; no validation is performed that it matches.
pub struct HfTokenCounter {
    tokenizer: Tokenizer,
}

impl std::fmt::Debug for HfTokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HfTokenCounter").finish_non_exhaustive()
    }
}

impl HfTokenCounter {
    /// Load an encoding from a `tokenizer.json` file.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Tokenizer`] if the file cannot be read
    /// or does not contain a valid tokenizer definition.
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::info!(path = %path.display(), "loading tokenizer encoding");
        let tokenizer =
            Tokenizer::from_file(path).map_err(|e| CorpusError::Tokenizer(e.to_string()))?;
        Ok(Self { tokenizer })
    }
}

impl TokenCounter for HfTokenCounter {
    fn count(&self, text: &str) -> Result<u64> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| CorpusError::Tokenizer(e.to_string()))?;
        Ok(encoding.get_ids().len() as u64)
    }
}
