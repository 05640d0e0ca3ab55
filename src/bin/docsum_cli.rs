//! Command-line entrypoint.
//!
//! Runs the same extraction and summary pipeline as the HTTP server against a local file, using
//! the same environment configuration.
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docsum::{
    config,
    processing::{DocumentService, DocumentUpload},
};

#[derive(Parser)]
#[command(name = "docsum-cli", about = "Summarize Word documents with a local Ollama model")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize a local .docx file.
    Summarize {
        /// Path to the document.
        path: PathBuf,
        /// Also print the extracted text preview.
        #[arg(long)]
        show_text: bool,
    },
    /// Print the extracted text without contacting the model.
    Extract {
        /// Path to the document.
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Arc::new(config::load_config().context("failed to load configuration")?);
    let service = DocumentService::new(config).context("failed to build summary service")?;

    match cli.command {
        Command::Summarize { path, show_text } => {
            let outcome = service
                .summarize_document(load_upload(&path).await?)
                .await
                .with_context(|| format!("failed to summarize {}", path.display()))?;
            if show_text {
                println!("{}\n", outcome.preview);
            }
            println!("{}", outcome.summary);
        }
        Command::Extract { path } => {
            let text = service
                .extract_text(load_upload(&path).await?)
                .await
                .with_context(|| format!("failed to extract {}", path.display()))?;
            println!("{text}");
        }
    }
    Ok(())
}

async fn load_upload(path: &Path) -> Result<DocumentUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(DocumentUpload::new(filename, bytes))
}
