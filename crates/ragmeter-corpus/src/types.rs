//! Typed chunk and document records.
//!
//! The upstream store persists chunk metadata as a loose JSON object;
//! reconstruction turns each row into a [`ChunkRecord`] with named
//! fields so the report layer never probes a map for optional keys.

use serde::Deserialize;

use crate::error::{CorpusError, Result};
use crate::store::StoreRecords;

/// Heading depth of an optional section annotation on a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLevel {
    Section,
    Subsection,
    Subsubsection,
}

impl SectionLevel {
    /// Label used for this level in the details report.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Section => "Section Name",
            Self::Subsection => "Subsection Name",
            Self::Subsubsection => "Subsubsection Name",
        }
    }
}

/// Metadata attached to one chunk by the embedding pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkMeta {
    pub nb_tokens: u64,
    pub url: String,
    pub file_name: String,
    pub chapter_name: String,
    /// Present heading levels, ordered from section to subsubsection.
    pub sections: Vec<(SectionLevel, String)>,
}

/// One retrievable unit of text reconstructed from the chunk store.
///
/// Immutable after reconstruction; consumed read-only by aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRecord {
    pub id: String,
    pub content: String,
    pub meta: ChunkMeta,
}

impl ChunkRecord {
    /// Number of characters (code points) in the chunk body.
    #[must_use]
    pub fn nb_chars(&self) -> u64 {
        self.content.chars().count() as u64
    }
}

/// Wire shape of a chunk metadata payload. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct RawChunkMeta {
    #[serde(default)]
    nb_tokens: u64,
    #[serde(default)]
    url: String,
    #[serde(default)]
    file_name: String,
    #[serde(default)]
    chapter_name: String,
    section_name: Option<String>,
    subsection_name: Option<String>,
    subsubsection_name: Option<String>,
}

impl From<RawChunkMeta> for ChunkMeta {
    fn from(raw: RawChunkMeta) -> Self {
        let mut sections = Vec::new();
        if let Some(name) = raw.section_name {
            sections.push((SectionLevel::Section, name));
        }
        if let Some(name) = raw.subsection_name {
            sections.push((SectionLevel::Subsection, name));
        }
        if let Some(name) = raw.subsubsection_name {
            sections.push((SectionLevel::Subsubsection, name));
        }
        Self {
            nb_tokens: raw.nb_tokens,
            url: raw.url,
            file_name: raw.file_name,
            chapter_name: raw.chapter_name,
            sections,
        }
    }
}

impl ChunkMeta {
    /// Decode a metadata payload as stored by the embedding pipeline.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if the payload is not a valid metadata object.
    pub fn from_json(value: &serde_json::Value) -> std::result::Result<Self, serde_json::Error> {
        let raw: RawChunkMeta = serde_json::from_value(value.clone())?;
        Ok(raw.into())
    }
}

/// Metadata of one original source file before chunking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub source: String,
    /// Derived by enrichment; absent until then and when `source` is empty.
    pub file_name: Option<String>,
    /// Attached by enrichment with the upstream tokenizer encoding.
    pub nb_tokens: Option<u64>,
}

/// One original document loaded from the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub content: String,
    pub metadata: DocumentMetadata,
}

/// Rebuild typed chunk records from the store's parallel arrays.
///
/// Order is preserved as returned by the store.
///
/// # Errors
///
/// Returns [`CorpusError::Metadata`] on the first malformed payload.
pub fn reconstruct_chunks(records: StoreRecords) -> Result<Vec<ChunkRecord>> {
    tracing::info!(
        total = records.ids.len(),
        "reconstructing chunks from the vector store"
    );
    let StoreRecords {
        ids,
        documents,
        metadatas,
    } = records;

    let mut chunks = Vec::with_capacity(ids.len());
    for ((id, content), metadata) in ids.into_iter().zip(documents).zip(metadatas) {
        let meta = ChunkMeta::from_json(&metadata).map_err(|source| CorpusError::Metadata {
            id: id.clone(),
            source,
        })?;
        chunks.push(ChunkRecord { id, content, meta });
    }

    tracing::info!(count = chunks.len(), "reconstructed chunks");
    Ok(chunks)
}
