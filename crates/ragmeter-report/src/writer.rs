//! Report and CSV writers.
//!
//! Output paths are derived by appending a suffix to the store path as
//! given on the command line; existing files are overwritten. The CSV
//! layout is the comma-space-separated format consumed by the course
//! tooling, not RFC 4180.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use ragmeter_corpus::ChunkRecord;

use crate::error::Result;
use crate::stats::{ChapterStats, char_stats, token_stats};

const DETAILS_SUFFIX: &str = "_chunks_details.txt";
const CHUNKS_CSV_SUFFIX: &str = "_chunks_stats.csv";
const CHAPTER_CSV_SUFFIX: &str = "_stats_by_chapter.csv";

fn suffixed(store_path: &Path, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{}{suffix}", store_path.display()))
}

fn sorted_by_id(chunks: &[ChunkRecord]) -> Vec<&ChunkRecord> {
    let mut sorted: Vec<&ChunkRecord> = chunks.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));
    sorted
}

/// Write the human-readable details report next to the store path.
///
/// The header carries corpus-wide token statistics (and character
/// statistics when `with_char_stats` is set), followed by one block per
/// chunk in ascending id order. Returns the output path.
///
/// # Errors
///
/// Returns an error on an empty corpus or if the file cannot be written.
pub fn write_details(
    chunks: &[ChunkRecord],
    store_path: &Path,
    with_char_stats: bool,
) -> Result<PathBuf> {
    let output = suffixed(store_path, DETAILS_SUFFIX);
    tracing::info!(path = %output.display(), "writing chunk details report");

    let tokens = token_stats(chunks)?;
    let mut out = String::new();
    out.push_str("Chunks Details :\n\n");
    out.push_str("Statistics of the tokens for all the chunks:\n");
    writeln!(out, "- Count : {}", tokens.count)?;
    writeln!(out, "- Mean : {}", tokens.display_mean())?;
    writeln!(out, "- Min : {}", tokens.min)?;
    writeln!(out, "- Max : {}\n", tokens.max)?;

    if with_char_stats {
        let chars = char_stats(chunks)?;
        out.push_str("Statistics of the characters for all the chunks:\n");
        writeln!(out, "- Count : {}", chars.count)?;
        writeln!(out, "- Mean : {}", chars.display_mean())?;
        writeln!(out, "- Min : {}", chars.min)?;
        writeln!(out, "- Max : {}\n", chars.max)?;
    }

    for chunk in sorted_by_id(chunks) {
        writeln!(out, "Chunk id: {}", chunk.id)?;
        if with_char_stats {
            writeln!(out, "Number of Characters: {}", chunk.nb_chars())?;
        }
        writeln!(out, "Number of Tokens: {}", chunk.meta.nb_tokens)?;
        writeln!(out, "Url: {}", chunk.meta.url)?;
        writeln!(out, "File Name: {}", chunk.meta.file_name)?;
        writeln!(out, "Chapter Name: {}", chunk.meta.chapter_name)?;
        for (level, name) in &chunk.meta.sections {
            writeln!(out, "{}: {name}", level.label())?;
        }
        out.push_str("Content:\n");
        writeln!(out, "{}\n", chunk.content)?;
    }

    fs::write(&output, out)?;
    tracing::info!(path = %output.display(), "chunk details report written");
    Ok(output)
}

/// Write the per-chunk CSV summary, one row per chunk sorted by id.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_chunks_csv(chunks: &[ChunkRecord], store_path: &Path) -> Result<PathBuf> {
    let output = suffixed(store_path, CHUNKS_CSV_SUFFIX);
    tracing::info!(path = %output.display(), "writing per-chunk statistics");

    let mut out = String::from("chunk_id, file_name, nb_chars, nb_tokens\n");
    for chunk in sorted_by_id(chunks) {
        writeln!(
            out,
            "{}, {}, {}, {}",
            chunk.id,
            chunk.meta.file_name,
            chunk.nb_chars(),
            chunk.meta.nb_tokens
        )?;
    }

    fs::write(&output, out)?;
    tracing::info!(path = %output.display(), "per-chunk statistics written");
    Ok(output)
}

/// Write the per-file CSV summary, one row per entry of `rows`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_chapter_csv(rows: &[ChapterStats], store_path: &Path) -> Result<PathBuf> {
    let output = suffixed(store_path, CHAPTER_CSV_SUFFIX);
    tracing::info!(path = %output.display(), "writing per-chapter statistics");

    let mut out = String::from("filename, token_number, chunk_number, token_number_from_chunks\n");
    for row in rows {
        writeln!(
            out,
            "{}, {}, {}, {}",
            row.file_name, row.token_number, row.chunk_number, row.token_number_from_chunks
        )?;
    }

    fs::write(&output, out)?;
    tracing::info!(path = %output.display(), "per-chapter statistics written");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use ragmeter_corpus::ChunkMeta;
    use serde_json::json;

    use super::*;

    fn chunk(id: &str, content: &str, meta: serde_json::Value) -> ChunkRecord {
        ChunkRecord {
            id: id.to_owned(),
            content: content.to_owned(),
            meta: ChunkMeta::from_json(&meta).unwrap(),
        }
    }

    fn sample_chunks() -> Vec<ChunkRecord> {
        vec![
            chunk(
                "c2",
                "bbbbbbbb",
                json!({
                    "nb_tokens": 20,
                    "url": "https://example.org/loops",
                    "file_name": "loops",
                    "chapter_name": "Loops",
                }),
            ),
            chunk(
                "c1",
                "aaaaa",
                json!({
                    "nb_tokens": 10,
                    "url": "https://example.org/intro#start",
                    "file_name": "intro",
                    "chapter_name": "Introduction",
                    "section_name": "Getting started",
                }),
            ),
            chunk(
                "c3",
                "cccccc",
                json!({
                    "nb_tokens": 30,
                    "url": "https://example.org/loops",
                    "file_name": "loops",
                    "chapter_name": "Loops",
                }),
            ),
        ]
    }

    fn store_path(dir: &Path) -> PathBuf {
        dir.join("chroma_db")
    }

    #[test]
    fn details_paths_append_suffix_without_extension_substitution() {
        let dir = tempfile::tempdir().unwrap();
        let output = write_details(&sample_chunks(), &store_path(dir.path()), true).unwrap();
        assert!(
            output
                .display()
                .to_string()
                .ends_with("chroma_db_chunks_details.txt")
        );
    }

    #[test]
    fn details_header_matches_worked_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let output = write_details(&sample_chunks(), &store_path(dir.path()), true).unwrap();
        let text = fs::read_to_string(output).unwrap();

        assert!(text.starts_with("Chunks Details :\n\n"));
        assert!(text.contains(
            "Statistics of the tokens for all the chunks:\n- Count : 60\n- Mean : 20.0\n- Min : 10\n- Max : 30\n"
        ));
        assert!(text.contains(
            "Statistics of the characters for all the chunks:\n- Count : 19\n- Mean : 6.333\n- Min : 5\n- Max : 8\n"
        ));
    }

    #[test]
    fn details_blocks_sorted_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let output = write_details(&sample_chunks(), &store_path(dir.path()), true).unwrap();
        let text = fs::read_to_string(output).unwrap();

        let p1 = text.find("Chunk id: c1").unwrap();
        let p2 = text.find("Chunk id: c2").unwrap();
        let p3 = text.find("Chunk id: c3").unwrap();
        assert!(p1 < p2 && p2 < p3);
    }

    #[test]
    fn details_lists_present_sections_only() {
        let dir = tempfile::tempdir().unwrap();
        let output = write_details(&sample_chunks(), &store_path(dir.path()), true).unwrap();
        let text = fs::read_to_string(output).unwrap();

        assert!(text.contains("Section Name: Getting started\n"));
        assert!(!text.contains("Subsection Name:"));
    }

    #[test]
    fn details_without_char_stats_omits_character_lines() {
        let dir = tempfile::tempdir().unwrap();
        let output = write_details(&sample_chunks(), &store_path(dir.path()), false).unwrap();
        let text = fs::read_to_string(output).unwrap();

        assert!(!text.contains("Statistics of the characters"));
        assert!(!text.contains("Number of Characters:"));
        assert!(text.contains("Number of Tokens: 10\n"));
    }

    #[test]
    fn details_empty_corpus_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_details(&[], &store_path(dir.path()), true);
        assert!(result.is_err());
        assert!(!store_path(dir.path()).with_file_name("chroma_db_chunks_details.txt").exists());
    }

    #[test]
    fn chunks_csv_one_row_per_chunk_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let output = write_chunks_csv(&sample_chunks(), &store_path(dir.path())).unwrap();
        let text = fs::read_to_string(output).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "chunk_id, file_name, nb_chars, nb_tokens");
        assert_eq!(lines[1], "c1, intro, 5, 10");
        assert_eq!(lines[2], "c2, loops, 8, 20");
        assert_eq!(lines[3], "c3, loops, 6, 30");
    }

    #[test]
    fn chapter_csv_round_trips_counts() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![
            ChapterStats {
                file_name: "intro".to_owned(),
                token_number: 100,
                chunk_number: 2,
                token_number_from_chunks: 30,
            },
            ChapterStats {
                file_name: "loops".to_owned(),
                token_number: 200,
                chunk_number: 1,
                token_number_from_chunks: 30,
            },
        ];
        let output = write_chapter_csv(&rows, &store_path(dir.path())).unwrap();
        let text = fs::read_to_string(output).unwrap();

        let mut parsed = Vec::new();
        for line in text.lines().skip(1) {
            let fields: Vec<&str> = line.split(", ").collect();
            parsed.push(ChapterStats {
                file_name: fields[0].to_owned(),
                token_number: fields[1].parse().unwrap(),
                chunk_number: fields[2].parse().unwrap(),
                token_number_from_chunks: fields[3].parse().unwrap(),
            });
        }
        assert_eq!(parsed, rows);
    }

    #[test]
    fn existing_output_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_path(dir.path());
        let target = PathBuf::from(format!("{}_chunks_stats.csv", store.display()));
        fs::write(&target, "stale content").unwrap();

        write_chunks_csv(&sample_chunks(), &store).unwrap();
        let text = fs::read_to_string(&target).unwrap();
        assert!(!text.contains("stale content"));
        assert!(text.starts_with("chunk_id,"));
    }
}
