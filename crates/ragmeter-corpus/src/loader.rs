//! Markdown corpus loader.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::{DocumentMetadata, SourceDocument};

fn is_markdown(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md" | "markdown")
    )
}

/// Load every Markdown file under `data_dir` as a source document.
///
/// The walk is recursive, skips hidden entries, and the resulting
/// documents are ordered by path so repeated runs over the same corpus
/// load in the same order.
///
/// # Errors
///
/// Returns an error if a matched file cannot be read.
pub async fn load_documents(data_dir: &Path) -> Result<Vec<SourceDocument>> {
    tracing::info!(dir = %data_dir.display(), "loading markdown documents");

    // The corpus directory must be read in full: ignore files inside it
    // (`.gitignore`, `.ignore`) do not apply, only hidden entries are
    // skipped.
    let mut paths: Vec<PathBuf> = ignore::WalkBuilder::new(data_dir)
        .standard_filters(false)
        .hidden(true)
        .build()
        .flatten()
        .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|p| is_markdown(p))
        .collect();
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let content = tokio::fs::read_to_string(&path).await?;
        documents.push(SourceDocument {
            content,
            metadata: DocumentMetadata {
                source: path.display().to_string(),
                file_name: None,
                nb_tokens: None,
            },
        });
    }

    tracing::info!(count = documents.len(), "loaded markdown documents");
    Ok(documents)
}
