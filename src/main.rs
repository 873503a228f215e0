use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::AsyncReadExt;

use doc_intake::agents::Content;
use doc_intake::config::IntakeConfig;
use doc_intake::llm::create_provider;
use doc_intake::memory::ConversationStore;
use doc_intake::pipeline::{IntakePipeline, TEXT_INPUT_SOURCE, file_source};

/// Classify a document (email, JSON, PDF text, plain text) and extract structured fields.
#[derive(Debug, Parser)]
#[command(name = "doc-intake", version)]
struct Cli {
    /// Read content from this file.
    #[arg(long, short, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Use this text as content.
    #[arg(long, short)]
    text: Option<String>,

    /// Print only the classification.
    #[arg(long)]
    classify_only: bool,

    /// Single-line JSON output.
    #[arg(long)]
    compact: bool,
}

/// Uploaded files stay bytes when they are PDFs or not valid UTF-8.
fn file_content(path: &Path, bytes: Vec<u8>) -> Content {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        return Content::Bytes(bytes);
    }
    match String::from_utf8(bytes) {
        Ok(text) => Content::Text(text),
        Err(e) => Content::Bytes(e.into_bytes()),
    }
}

async fn read_input(cli: &Cli) -> anyhow::Result<(String, Content)> {
    if let Some(path) = &cli.file {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        return Ok((file_source(&name), file_content(path, bytes)));
    }

    if let Some(text) = &cli.text {
        return Ok((TEXT_INPUT_SOURCE.to_string(), Content::Text(text.clone())));
    }

    let mut buf = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buf)
        .await
        .context("failed to read stdin")?;
    Ok((TEXT_INPUT_SOURCE.to_string(), Content::Text(buf)))
}

fn print_json<T: serde::Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let out = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{out}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = IntakeConfig::from_env()?;
    let llm = create_provider(&config.llm)?;

    let (source, content) = read_input(&cli).await?;
    if content.as_text().trim().is_empty() {
        anyhow::bail!("no content to process");
    }

    let store = Arc::new(ConversationStore::new());
    let pipeline = IntakePipeline::with_llm(llm, store);

    if cli.classify_only {
        let classification = pipeline.router().classify(&source, &content.as_text()).await;
        return print_json(&classification, cli.compact);
    }

    let outcome = pipeline.run(&source, content).await?;
    print_json(&outcome, cli.compact)
}
