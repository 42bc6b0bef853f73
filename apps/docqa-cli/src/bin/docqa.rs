use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use docqa_core::config::Config;
use docqa_llm::OllamaClient;
use docqa_rag::{Pipeline, UploadFile};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docqa", about = "Ask questions about your documents", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store, extract and index files
    Ingest {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Index every file under a folder in place
    Seed { dir: PathBuf },
    /// Answer a question from the indexed documents
    Ask {
        question: String,
        #[arg(long, default_value_t = 5)]
        top_k: usize,
    },
    /// List indexed documents
    Documents {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Create the collection, or recreate it if the embedding dimension changed
    Migrate,
    /// Probe the completion service
    Health,
    /// Show the parser used for each document type
    Parsers,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let settings = config.settings()?;
    info!(
        backend = ?settings.index.backend,
        url = %settings.index.url,
        collection = %settings.index.collection,
        llm = %settings.llm.model,
        "Using index and completion service"
    );

    match cli.command {
        Command::Health => {
            let client = OllamaClient::new(&settings.llm)?;
            print_json(&client.health().await?)?;
        }
        Command::Parsers => {
            let parsers: serde_json::Map<String, serde_json::Value> = docqa_text::supported_parsers()
                .into_iter()
                .map(|(kind, parser)| (kind.to_string(), json!(parser)))
                .collect();
            print_json(&parsers)?;
        }
        Command::Migrate => {
            let pipeline = Pipeline::migrate(&settings).await?;
            print_json(&json!({
                "collection": pipeline.index.collection(),
                "dim": pipeline.index.dim(),
                "result": pipeline.collection_status,
            }))?;
        }
        Command::Ingest { files } => {
            let pipeline = Pipeline::from_settings(&settings).await?;
            let mut batch = Vec::with_capacity(files.len());
            for path in &files {
                let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
                let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
                batch.push(UploadFile::new(name, bytes));
            }
            print_json(&pipeline.ingestor.ingest_batch(batch).await)?;
        }
        Command::Seed { dir } => {
            let pipeline = Pipeline::from_settings(&settings).await?;
            let total = pipeline.ingestor.seed_files(&dir)?.len();
            let pb = ProgressBar::new(total as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?
                    .progress_chars("#>-"),
            );
            let report = pipeline
                .ingestor
                .seed_folder(&dir, |file| {
                    pb.set_message(format!("{} ({} chunks)", file.name, file.chunks));
                    pb.inc(1);
                })
                .await?;
            pb.finish_and_clear();
            print_json(&report)?;
        }
        Command::Ask { question, top_k } => {
            let pipeline = Pipeline::from_settings(&settings).await?;
            print_json(&pipeline.assistant.answer(&question, top_k).await?)?;
        }
        Command::Documents { limit } => {
            let pipeline = Pipeline::from_settings(&settings).await?;
            print_json(&pipeline.index.list_unique_documents(limit).await?)?;
        }
    }
    Ok(())
}
