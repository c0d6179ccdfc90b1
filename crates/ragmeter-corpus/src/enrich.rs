//! Document metadata enrichment: derived file names and token counts.

use std::collections::HashSet;

use crate::error::Result;
use crate::tokens::TokenCounter;
use crate::types::SourceDocument;

/// Derive a file name from a path-like `source` value.
///
/// Takes the last `/`-separated segment and keeps the part before the
/// first `.`, so `"a/b/c.md"` yields `"c"`. An empty source yields
/// `None`, leaving downstream per-file lookups unmatched.
#[must_use]
pub fn derive_file_name(source: &str) -> Option<String> {
    if source.is_empty() {
        return None;
    }
    let last = source.rsplit('/').next().unwrap_or(source);
    let stem = last.split('.').next().unwrap_or(last);
    Some(stem.to_owned())
}

/// Attach a derived `file_name` to every document that has a source.
pub fn add_file_names(documents: &mut [SourceDocument]) {
    tracing::info!("adding file names to document metadata");
    for document in documents.iter_mut() {
        document.metadata.file_name = derive_file_name(&document.metadata.source);
    }
}

/// Attach a token count to every document.
///
/// The counter must use the same encoding as the upstream embedding
/// run; a mismatched encoding silently skews every token statistic.
///
/// # Errors
///
/// Returns an error if the tokenizer fails to encode a document.
pub fn add_token_counts(
    documents: &mut [SourceDocument],
    counter: &dyn TokenCounter,
) -> Result<()> {
    tracing::info!("adding token counts to document metadata");
    for document in documents.iter_mut() {
        document.metadata.nb_tokens = Some(counter.count(&document.content)?);
    }
    Ok(())
}

/// Distinct file names across the corpus, in first-seen order.
#[must_use]
pub fn file_names(documents: &[SourceDocument]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for document in documents {
        if let Some(name) = &document.metadata.file_name
            && seen.insert(name.clone())
        {
            names.push(name.clone());
        }
    }
    names
}
