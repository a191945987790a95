//! Upsert command implementation.

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use crate::cli::output::get_formatter;
use crate::models::{Config, Language, OutputFormat};
use crate::services::{
    CsvSource, IndexState, VectorStoreClient, latest_embedding_file, run_upsert_pass,
};

#[derive(Debug, Args)]
pub struct UpsertArgs {
    /// Transcript language, selects the default embeddings file
    #[arg(long, short = 'l', default_value = "en")]
    pub lang: Language,

    /// Embeddings file to read instead of the newest one
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,
}

pub async fn handle_upsert(args: UpsertArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let input = match args.input {
        Some(path) => path,
        None => {
            let stem = config.transcript.embeddings_stem(args.lang);
            latest_embedding_file(&config.transcript.data_dir, &stem)
                .with_context(|| {
                    format!(
                        "failed to list data directory: {}",
                        config.transcript.data_dir.display()
                    )
                })?
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "no {} embeddings found in {}; run the embed command first",
                        args.lang,
                        config.transcript.data_dir.display()
                    )
                })?
        }
    };

    let row_count = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read embeddings file: {}", input.display()))?
        .lines()
        .count();

    if verbose {
        eprintln!("Embeddings: {} ({} rows)", input.display(), row_count);
    }

    let store = VectorStoreClient::new(&config.vector_store)?;
    let state = store
        .ensure_index()
        .await
        .context("failed to ensure the index exists")?;
    if state == IndexState::Created && verbose {
        eprintln!("Created index: {}", store.index());
    }

    let source = CsvSource::open(&input)
        .with_context(|| format!("failed to open embeddings file: {}", input.display()))?;

    let pb = ProgressBar::new(row_count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .unwrap()
            .progress_chars("#>-"),
    );

    let summary = run_upsert_pass(&store, source, &pb).await?;
    pb.finish_and_clear();

    print!("{}", formatter.format_upsert_summary(&summary));

    Ok(())
}
