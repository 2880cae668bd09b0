// SPDX-License-Identifier: MIT OR Apache-2.0

//! btembed - BridgeTower image-text embeddings from the command line
//!
//! Thin front end over the `btembed` library: loads configuration, builds the
//! configured embedding function, and prints vectors as text or JSON.

mod cli;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Commands, OutputFormat};
use tracing_subscriber::EnvFilter;

use btembed::config::Config;
use btembed::embedding::{create_embedder, BarProgress, BridgeTowerEmbeddings, Embeddings};
use btembed::manifest::PairManifest;
use btembed::output;

fn main() -> Result<()> {
    // Initialize tracing with BTEMBED_LOG env var (e.g., BTEMBED_LOG=debug btembed query "hello")
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("BTEMBED_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli.format;

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "btembed", &mut std::io::stdout());
        return Ok(());
    }

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_file(path)?,
        None => Config::load(),
    }
    .with_env_overrides()?;

    let embedder =
        create_embedder(config.embeddings()).context("Failed to set up embedding function")?;
    let mut adapter = BridgeTowerEmbeddings::new(embedder);
    if config.progress() && !cli.no_progress {
        adapter = adapter.with_progress(BarProgress::new("Processing pairs"));
    }
    tracing::debug!(model = adapter.embedder().model_id(), "adapter ready");

    match cli.command {
        Commands::Pairs {
            manifest,
            texts,
            images,
        } => {
            let (texts, images) = match manifest {
                Some(path) => PairManifest::load(&path)?.into_columns(),
                None => (texts, images),
            };
            let vectors = adapter.embed_image_text_pairs(&texts, &images)?;
            print_vectors(&vectors, format)?;
        }
        Commands::Documents { texts } => {
            let vectors = adapter.embed_documents(&texts)?;
            print_vectors(&vectors, format)?;
        }
        Commands::Query { text } => {
            let vector = adapter.embed_query(&text)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string(&vector)?),
                OutputFormat::Text => {
                    println!("{}", output::format_vector_line(0, &vector, output::use_colors()))
                }
            }
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn print_vectors(vectors: &[Vec<f32>], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(vectors)?),
        OutputFormat::Text => {
            let use_color = output::use_colors();
            for (index, vector) in vectors.iter().enumerate() {
                println!("{}", output::format_vector_line(index, vector, use_color));
            }
        }
    }
    Ok(())
}
