use std::path::{Path, PathBuf};

use anyhow::bail;
use clap::{Parser, Subcommand};
use ragmeter_corpus::{
    ChunkStore, HfTokenCounter, SqliteChunkStore, add_file_names, add_token_counts, file_names,
    load_documents, reconstruct_chunks,
};
use ragmeter_report::questions::DEFAULT_CHAPTER_PREFIX;
use ragmeter_report::{
    UrlChecker, UrlStatus, convert_questions, stats_by_chapter, write_chapter_csv,
    write_chunks_csv, write_details,
};

/// Tokenizer encoding file persisted by the embedding pipeline inside
/// the store directory.
const STORE_TOKENIZER_FILE: &str = "tokenizer.json";

#[derive(Parser)]
#[command(
    name = "ragmeter",
    version,
    about = "Chunk and corpus statistics tools for a RAG question-answering pipeline"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export chunk details and per-chunk statistics from a persisted chunk store.
    ChunkStats {
        /// The path to the directory containing the persisted chunk store.
        #[arg(long = "chroma_path", value_name = "DIR")]
        chroma_path: Option<PathBuf>,
    },
    /// Export chunk details and per-file statistics cross-referenced
    /// with the original Markdown corpus.
    ChapterStats {
        /// The path to the directory containing the Markdown documents.
        #[arg(long = "data_dir", value_name = "DIR")]
        data_dir: Option<PathBuf>,
        /// The path to the directory containing the persisted chunk store.
        #[arg(long = "chroma_path", value_name = "DIR")]
        chroma_path: Option<PathBuf>,
        /// Tokenizer encoding file; defaults to the one persisted
        /// inside the store directory.
        #[arg(long, value_name = "FILE")]
        tokenizer: Option<PathBuf>,
    },
    /// Check URLs and in-page anchors referenced by an exported details report.
    CheckUrls {
        /// The path to the details report containing `Url:` lines.
        report: PathBuf,
    },
    /// Convert a flat question file into a structured YAML document.
    ConvertQuestions {
        /// The path to the flat question file.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// The path of the YAML file to write.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
        /// Line prefix that opens a new chapter.
        #[arg(long, value_name = "PREFIX", default_value = DEFAULT_CHAPTER_PREFIX)]
        chapter_prefix: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command {
        Command::ChunkStats { chroma_path } => {
            let chroma_path = required_dir(chroma_path, "--chroma_path")?;
            run_chunk_stats(&chroma_path).await
        }
        Command::ChapterStats {
            data_dir,
            chroma_path,
            tokenizer,
        } => {
            let data_dir = required_dir(data_dir, "--data_dir")?;
            let chroma_path = required_dir(chroma_path, "--chroma_path")?;
            run_chapter_stats(&data_dir, &chroma_path, tokenizer).await
        }
        Command::CheckUrls { report } => run_check_urls(&report).await,
        Command::ConvertQuestions {
            input,
            output,
            chapter_prefix,
        } => {
            convert_questions(&input, &output, &chapter_prefix)?;
            Ok(())
        }
    }
}

/// Validate a required directory flag; missing or non-existent paths
/// are configuration errors terminating the run.
fn required_dir(value: Option<PathBuf>, flag: &str) -> anyhow::Result<PathBuf> {
    let Some(path) = value else {
        tracing::error!("please specify a directory with {flag}");
        bail!("missing required argument {flag}");
    };
    if !path.exists() {
        tracing::error!(
            "the directory '{}' specified by {flag} does not exist",
            path.display()
        );
        bail!("the directory '{}' does not exist", path.display());
    }
    Ok(path)
}

async fn run_chunk_stats(chroma_path: &Path) -> anyhow::Result<()> {
    let store = SqliteChunkStore::open(chroma_path).await?;
    let chunks = reconstruct_chunks(store.get_all().await?)?;

    let details = write_details(&chunks, chroma_path, true)?;
    let csv = write_chunks_csv(&chunks, chroma_path)?;
    tracing::info!(
        details = %details.display(),
        stats = %csv.display(),
        "chunk statistics exported"
    );
    Ok(())
}

async fn run_chapter_stats(
    data_dir: &Path,
    chroma_path: &Path,
    tokenizer: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut documents = load_documents(data_dir).await?;
    add_file_names(&mut documents);

    let tokenizer_path = tokenizer.unwrap_or_else(|| chroma_path.join(STORE_TOKENIZER_FILE));
    let counter = HfTokenCounter::from_file(&tokenizer_path)?;
    add_token_counts(&mut documents, &counter)?;
    let names = file_names(&documents);

    let store = SqliteChunkStore::open(chroma_path).await?;
    let chunks = reconstruct_chunks(store.get_all().await?)?;

    let details = write_details(&chunks, chroma_path, false)?;
    let rows = stats_by_chapter(&names, &documents, &chunks);
    let csv = write_chapter_csv(&rows, chroma_path)?;
    tracing::info!(
        details = %details.display(),
        stats = %csv.display(),
        "chapter statistics exported"
    );
    Ok(())
}

async fn run_check_urls(report: &Path) -> anyhow::Result<()> {
    if !report.exists() {
        tracing::error!("the report file '{}' does not exist", report.display());
        bail!("the report file '{}' does not exist", report.display());
    }

    let results = UrlChecker::new().check_report(report).await?;
    let broken = results
        .iter()
        .filter(|c| c.status != UrlStatus::Ok)
        .count();
    tracing::info!(checked = results.len(), broken, "URL check finished");
    Ok(())
}
