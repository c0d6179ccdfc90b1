//! Corpus-wide and per-file statistics over chunk records.

use ragmeter_corpus::{ChunkRecord, SourceDocument};

use crate::error::{ReportError, Result};

/// Sum, mean, min, and max over one numeric field of the corpus.
///
/// `count` is the field sum, matching the exported report headers.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldStats {
    pub count: u64,
    pub mean: f64,
    pub min: u64,
    pub max: u64,
}

impl FieldStats {
    fn over(values: impl Iterator<Item = u64>) -> Result<Self> {
        let mut count = 0u64;
        let mut n = 0u64;
        let mut min = u64::MAX;
        let mut max = 0u64;
        for value in values {
            count += value;
            n += 1;
            min = min.min(value);
            max = max.max(value);
        }
        if n == 0 {
            return Err(ReportError::EmptyCorpus);
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = count as f64 / n as f64;
        Ok(Self {
            count,
            mean,
            min,
            max,
        })
    }

    /// Mean rounded to 3 decimal places, for display only.
    ///
    /// Trailing zeros are trimmed but one decimal is always kept, so a
    /// whole-number mean reads `20.0`, not `20`.
    #[must_use]
    pub fn display_mean(&self) -> String {
        let rounded = (self.mean * 1000.0).round() / 1000.0;
        let mut text = format!("{rounded:.3}");
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.push('0');
        }
        text
    }
}

/// Token statistics over all chunk records.
///
/// # Errors
///
/// Returns [`ReportError::EmptyCorpus`] when `chunks` is empty.
pub fn token_stats(chunks: &[ChunkRecord]) -> Result<FieldStats> {
    FieldStats::over(chunks.iter().map(|c| c.meta.nb_tokens))
}

/// Character statistics over all chunk bodies.
///
/// # Errors
///
/// Returns [`ReportError::EmptyCorpus`] when `chunks` is empty.
pub fn char_stats(chunks: &[ChunkRecord]) -> Result<FieldStats> {
    FieldStats::over(chunks.iter().map(ChunkRecord::nb_chars))
}

/// One per-file row of the chapter statistics CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterStats {
    pub file_name: String,
    /// Token count of the matching source document. When several
    /// documents share a file name the last one loaded wins; callers
    /// should keep file names unique.
    pub token_number: u64,
    pub chunk_number: u64,
    pub token_number_from_chunks: u64,
}

/// Per-file token and chunk counts, one row per entry of `file_names`.
#[must_use]
pub fn stats_by_chapter(
    file_names: &[String],
    documents: &[SourceDocument],
    chunks: &[ChunkRecord],
) -> Vec<ChapterStats> {
    file_names
        .iter()
        .map(|name| {
            let mut token_number = 0;
            let mut matches = 0u32;
            for document in documents {
                if document.metadata.file_name.as_deref() == Some(name) {
                    if matches > 0 {
                        tracing::warn!(
                            file = %name,
                            "duplicate file name in corpus, keeping the last match"
                        );
                    }
                    token_number = document.metadata.nb_tokens.unwrap_or(0);
                    matches += 1;
                }
            }

            let mut chunk_number = 0;
            let mut token_number_from_chunks = 0;
            for chunk in chunks {
                if chunk.meta.file_name == *name {
                    chunk_number += 1;
                    token_number_from_chunks += chunk.meta.nb_tokens;
                }
            }

            ChapterStats {
                file_name: name.clone(),
                token_number,
                chunk_number,
                token_number_from_chunks,
            }
        })
        .collect()
}
