//! Embed command implementation.

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use crate::cli::output::get_formatter;
use crate::models::{Config, Language, OutputFormat};
use crate::services::{
    CsvSink, EmbeddingClient, TranscriptParser, run_embed_pass, timestamped_path,
};

#[derive(Debug, Args)]
pub struct EmbedArgs {
    /// Transcript language, selects the default input and output names
    #[arg(long, short = 'l', default_value = "en")]
    pub lang: Language,

    /// Transcript file to read instead of the language default
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Embeddings file to write instead of a timestamped default
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub async fn handle_embed(args: EmbedArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let input = args
        .input
        .unwrap_or_else(|| config.transcript.chat_file(args.lang));
    let content = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read transcript: {}", input.display()))?;
    let line_count = content.lines().count();

    if line_count == 0 {
        println!(
            "{}",
            formatter.format_message("Transcript is empty, nothing to embed.")
        );
        return Ok(());
    }

    if verbose {
        eprintln!("Transcript: {} ({} lines)", input.display(), line_count);
    }

    let output = match args.output {
        Some(path) => path,
        None => {
            std::fs::create_dir_all(&config.transcript.data_dir)
                .context("failed to create data directory")?;
            timestamped_path(
                &config.transcript.data_dir,
                &config.transcript.embeddings_stem(args.lang),
            )
        }
    };

    let client = EmbeddingClient::new(&config.embedding)?;
    let parser = TranscriptParser::default();
    let mut sink = CsvSink::create(&output)
        .with_context(|| format!("failed to create embeddings file: {}", output.display()))?;

    let pb = ProgressBar::new(line_count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .unwrap()
            .progress_chars("#>-"),
    );

    let summary = run_embed_pass(&parser, &client, &content, &mut sink, &pb).await?;
    pb.finish_and_clear();

    print!("{}", formatter.format_embed_summary(&summary));
    println!(
        "{}",
        formatter.format_message(&format!("Embeddings written to: {}", output.display()))
    );

    Ok(())
}
