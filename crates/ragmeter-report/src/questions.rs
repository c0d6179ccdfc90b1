//! Question-bank text to YAML conversion.

use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::Result;

/// Default line prefix opening a new chapter in the flat question file.
pub const DEFAULT_CHAPTER_PREFIX: &str = "Chapitre";

/// One chapter of the question bank, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title: String,
    pub questions: Vec<String>,
}

/// Parsed question bank, chapters and questions in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    pub chapters: Vec<Chapter>,
}

impl QuestionBank {
    /// Total number of questions across all chapters.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.chapters.iter().map(|c| c.questions.len()).sum()
    }

    /// Build the YAML document: `questions` mapping each chapter title
    /// to a sequence of single-entry `Qn: text` mappings, preserving
    /// insertion order.
    #[must_use]
    pub fn to_yaml(&self) -> Value {
        let mut chapters = Mapping::new();
        for chapter in &self.chapters {
            let questions: Vec<Value> = chapter
                .questions
                .iter()
                .enumerate()
                .map(|(i, question)| {
                    let mut entry = Mapping::new();
                    entry.insert(
                        Value::String(format!("Q{}", i + 1)),
                        Value::String(question.clone()),
                    );
                    Value::Mapping(entry)
                })
                .collect();
            chapters.insert(
                Value::String(chapter.title.clone()),
                Value::Sequence(questions),
            );
        }

        let mut root = Mapping::new();
        root.insert(Value::String("questions".to_owned()), Value::Mapping(chapters));
        Value::Mapping(root)
    }
}

/// Parse a flat question file.
///
/// A line starting with `chapter_prefix` opens a new chapter; any other
/// non-empty line is a question (a leading `*` is stripped); empty
/// lines are ignored. Questions appearing before the first chapter
/// heading have no chapter to belong to and are dropped.
#[must_use]
pub fn parse_question_bank(text: &str, chapter_prefix: &str) -> QuestionBank {
    let mut chapters = Vec::new();
    let mut current: Option<Chapter> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.starts_with(chapter_prefix) {
            if let Some(done) = current.take() {
                chapters.push(done);
            }
            current = Some(Chapter {
                title: line.to_owned(),
                questions: Vec::new(),
            });
        } else if !line.is_empty() {
            let question = line.strip_prefix('*').map_or(line, str::trim);
            if let Some(chapter) = current.as_mut() {
                chapter.questions.push(question.to_owned());
            }
        }
    }
    if let Some(done) = current.take() {
        chapters.push(done);
    }

    QuestionBank { chapters }
}

/// Convert a flat question file into a structured YAML document.
///
/// # Errors
///
/// Returns an error if the input cannot be read or the output cannot
/// be written.
pub fn convert_questions(input: &Path, output: &Path, chapter_prefix: &str) -> Result<()> {
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        "converting questions to YAML"
    );

    let text = fs::read_to_string(input)?;
    let bank = parse_question_bank(&text, chapter_prefix);
    tracing::info!(
        chapters = bank.chapters.len(),
        questions = bank.total_questions(),
        "parsed question bank"
    );

    let yaml = serde_yaml::to_string(&bank.to_yaml())?;
    fs::write(output, yaml)?;

    tracing::info!(path = %output.display(), "questions converted");
    Ok(())
}
