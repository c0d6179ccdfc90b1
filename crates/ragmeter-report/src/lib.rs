//! Aggregation and export for the ragmeter statistics tools.
//!
//! Computes corpus-wide and per-file statistics over reconstructed
//! chunk records, writes the details report and CSV summaries, checks
//! URLs referenced by an exported report, and converts flat question
//! files to YAML.

pub mod error;
pub mod questions;
pub mod stats;
pub mod urlcheck;
pub mod writer;

pub use error::{ReportError, Result};
pub use questions::{Chapter, QuestionBank, convert_questions, parse_question_bank};
pub use stats::{ChapterStats, FieldStats, char_stats, stats_by_chapter, token_stats};
pub use urlcheck::{UrlCheck, UrlChecker, UrlStatus};
pub use writer::{write_chapter_csv, write_chunks_csv, write_details};
