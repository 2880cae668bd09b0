// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// btembed - BridgeTower image-text embeddings
///
/// Embeds image-text pairs, documents, and queries through a configurable
/// embedding function (external command, HTTP endpoint, or offline dummy).
#[derive(Parser, Debug)]
#[command(name = "btembed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Config file to use instead of .btembedrc.toml / ~/.config/btembed/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long, global = true)]
    pub no_progress: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Embed image-text pairs
    Pairs {
        /// JSON manifest of {"text", "image"} entries
        #[arg(short, long, conflicts_with_all = ["texts", "images"])]
        manifest: Option<PathBuf>,

        /// Pair text (repeatable, paired by position with --image)
        #[arg(long = "text")]
        texts: Vec<String>,

        /// Pair image path (repeatable, paired by position with --text)
        #[arg(long = "image")]
        images: Vec<String>,
    },

    /// Embed text documents
    Documents {
        /// Documents to embed
        #[arg(required = true)]
        texts: Vec<String>,
    },

    /// Embed a single query
    Query {
        /// Query text
        text: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
