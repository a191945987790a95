//! CLI module for the transcript embedding pipeline.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::models::OutputFormat;

/// Chat transcript embedding and nearest-neighbor search CLI.
#[derive(Debug, Parser)]
#[command(name = "chatvec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(long, short = 'f', global = true, help = "Output format: text or json")]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Embed transcript messages into a CSV file
    Embed(commands::EmbedArgs),

    /// Upsert stored embeddings into the vector index
    Upsert(commands::UpsertArgs),

    /// Interactively search the index for similar messages
    Query(commands::QueryArgs),

    /// Check embedding service and vector store status
    Status(commands::StatusArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::ConfigCommand),
}

// FromStr is implemented in models::search
