//! Corpus access for the ragmeter statistics tools.
//!
//! Loads the original Markdown corpus, reconstructs typed chunk records
//! from the persisted chunk store, and enriches document metadata with
//! derived file names and token counts. The store and the tokenizer are
//! external collaborators reached through narrow trait seams
//! ([`store::ChunkStore`], [`tokens::TokenCounter`]).

pub mod enrich;
pub mod error;
pub mod loader;
pub mod store;
pub mod tokens;
pub mod types;

pub use enrich::{add_file_names, add_token_counts, derive_file_name, file_names};
pub use error::{CorpusError, Result};
pub use loader::load_documents;
pub use store::{ChunkStore, InMemoryChunkStore, SqliteChunkStore, StoreError, StoreRecords};
pub use tokens::{HfTokenCounter, TokenCounter};
pub use types::{
    ChunkMeta, ChunkRecord, DocumentMetadata, SectionLevel, SourceDocument, reconstruct_chunks,
};
