//! Interactive query command implementation.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::io::BufRead;
use std::time::Instant;
use tracing::{error, warn};

use crate::cli::output::{Formatter, get_formatter};
use crate::models::{Config, OutputFormat, SearchHit, SearchHits};
use crate::services::{EmbeddingClient, VectorStoreClient};

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// How many matches to return per query
    #[arg(long, short = 'k')]
    pub top_k: Option<usize>,
}

pub async fn handle_query(args: QueryArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let top_k = args.top_k.unwrap_or(config.search.top_k);
    if top_k == 0 {
        anyhow::bail!("top-k must be at least 1");
    }

    let client = EmbeddingClient::new(&config.embedding)?;
    let store = VectorStoreClient::new(&config.vector_store)?;

    let stdin = std::io::stdin();
    run_query_loop(
        &client,
        &store,
        top_k,
        stdin.lock(),
        formatter.as_ref(),
        verbose,
    )
    .await
}

/// Prompt for queries until the user types "end" or input runs out.
///
/// Embedding and query failures skip the iteration; fetch failures fall back
/// to the values already present on the match.
async fn run_query_loop(
    client: &EmbeddingClient,
    store: &VectorStoreClient,
    top_k: usize,
    input: impl BufRead,
    formatter: &dyn Formatter,
    verbose: bool,
) -> Result<()> {
    store
        .project()
        .await
        .context("failed to resolve the project owning the index")?;

    let mut lines = input.lines();
    loop {
        println!(
            "{}",
            style("Please enter a message to search for (or type \"end\" to exit):").cyan()
        );
        let line = match lines.next() {
            Some(line) => line.context("failed to read query input")?,
            None => break,
        };
        let query = line.trim();
        if query.eq_ignore_ascii_case("end") {
            println!("{}", formatter.format_message("Exiting search."));
            break;
        }
        if query.is_empty() {
            continue;
        }

        let start = Instant::now();
        let embedding = match client.embed(query).await {
            Ok(values) => values,
            Err(err) => {
                error!(error = %err, query, "failed to embed query");
                eprint!("{}", formatter.format_error(&err.to_string()));
                continue;
            }
        };
        let embed_ms = start.elapsed().as_millis();

        let query_start = Instant::now();
        let matches = match store.query(embedding, top_k).await {
            Ok(matches) => matches,
            Err(err) => {
                error!(error = %err, query, "index query failed");
                eprint!("{}", formatter.format_error(&err.to_string()));
                continue;
            }
        };
        let query_ms = query_start.elapsed().as_millis();

        let mut hits = Vec::with_capacity(matches.len());
        for m in matches {
            let values = match store.fetch(&m.id).await {
                Ok(Some(fetched)) => fetched.values,
                Ok(None) => {
                    warn!(id = %m.id, "matched vector not found on fetch");
                    m.values.clone()
                }
                Err(err) => {
                    warn!(error = %err, id = %m.id, "fetch failed, using match values");
                    m.values.clone()
                }
            };
            hits.push(SearchHit {
                text: m.text().map(String::from),
                score: m.score,
                values,
                id: m.id,
            });
        }

        if verbose {
            eprintln!("Timing:");
            eprintln!("  Embedding: {embed_ms}ms");
            eprintln!("  Query: {query_ms}ms");
            eprintln!();
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let results = SearchHits::new(query.to_string(), hits, duration_ms);
        print!("{}", formatter.format_hits(&results));
    }

    Ok(())
}
