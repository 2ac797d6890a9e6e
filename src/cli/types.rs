//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Default location of the persisted vector store
pub const DEFAULT_SNAPSHOT: &str = ".meeting-rag/index.json";

#[derive(Parser, Debug)]
#[command(name = "meeting-rag")]
#[command(about = "Index meeting transcripts and ask questions about them", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Vector store snapshot file
    #[arg(long, global = true, env = "MEETING_RAG_SNAPSHOT", default_value = DEFAULT_SNAPSHOT)]
    pub snapshot: PathBuf,

    /// Explicit config file (defaults to .meeting-rag/config.yaml plus env overrides)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index a meeting's segments into the snapshot
    Index(IndexArgs),

    /// Ask a question about indexed meetings
    Ask(AskArgs),

    /// Show vector counts and provider status
    Status,

    /// Remove every indexed record
    Clear,
}

#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Meeting identifier
    #[arg(short, long)]
    pub meeting: String,

    /// JSON file holding an array of segments
    pub segments: PathBuf,
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question
    pub question: String,

    /// Meeting whose records are ranked higher
    #[arg(short, long)]
    pub meeting: Option<String>,

    /// Override the similarity threshold for this question
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Override the number of records retrieved
    #[arg(short, long)]
    pub limit: Option<usize>,
}
