//! The embed and upsert passes over a chat transcript.

use std::collections::HashMap;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::models::EmbeddingRecord;
use crate::services::{
    CsvSink, CsvSource, EmbeddingClient, TranscriptParser, VectorEntry, VectorStoreClient,
};

/// Counters for one run of the embed pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbedSummary {
    pub lines: u64,
    pub successes: u64,
    pub parse_failures: u64,
    pub embedding_failures: u64,
    pub write_failures: u64,
}

/// Counters for one run of the upsert pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertSummary {
    pub rows: u64,
    pub successes: u64,
    pub parse_skipped: u64,
    pub failures: u64,
}

/// Embed every message in the transcript and append one CSV row per result.
///
/// Lines with no extractable message and lines whose embedding request fails
/// are counted and skipped; the pass continues until the transcript ends.
pub async fn run_embed_pass(
    parser: &TranscriptParser,
    client: &EmbeddingClient,
    content: &str,
    sink: &mut CsvSink,
    progress: &ProgressBar,
) -> Result<EmbedSummary> {
    let mut summary = EmbedSummary::default();

    for (index, line) in content.lines().enumerate() {
        let ordinal = index + 1;
        summary.lines += 1;
        progress.inc(1);

        let message = match parser.parse_line(line) {
            Some(message) => message,
            None => {
                summary.parse_failures += 1;
                warn!(line = ordinal, raw = line, "no message in transcript line");
                continue;
            }
        };
        if message.is_empty() {
            warn!(line = ordinal, "transcript line has an empty message");
        }

        let values = match client.embed(message).await {
            Ok(values) => values,
            Err(error) => {
                summary.embedding_failures += 1;
                error!(?error, line = ordinal, "embedding request failed");
                continue;
            }
        };

        if let Err(error) = sink.append(&EmbeddingRecord::new(message, values)) {
            summary.write_failures += 1;
            error!(?error, line = ordinal, "failed to write embedding row");
            continue;
        }
        summary.successes += 1;
    }

    sink.flush().context("failed to flush embeddings file")?;
    info!(
        lines = summary.lines,
        successes = summary.successes,
        parse_failures = summary.parse_failures,
        embedding_failures = summary.embedding_failures,
        write_failures = summary.write_failures,
        "embed pass finished"
    );
    Ok(summary)
}

/// Upsert every stored embedding row into the vector index.
///
/// The project owning the index is resolved once up front; each row becomes
/// one vector named after its 1-based position in the file.
pub async fn run_upsert_pass(
    store: &VectorStoreClient,
    source: CsvSource,
    progress: &ProgressBar,
) -> Result<UpsertSummary> {
    let project = store
        .project()
        .await
        .context("failed to resolve the project owning the index")?;
    info!(project, index = store.index(), "upserting into index");

    let mut summary = UpsertSummary::default();

    for (row, record) in source.rows() {
        summary.rows += 1;
        progress.inc(1);

        let record = match record {
            Ok(record) => record,
            Err(error) => {
                summary.parse_skipped += 1;
                warn!(?error, row, "skipping unparseable row");
                continue;
            }
        };

        let entry = VectorEntry {
            id: format!("vector_id_{row}"),
            values: record.values,
            metadata: Some(HashMap::from([(
                "text".to_string(),
                serde_json::Value::String(record.text),
            )])),
        };
        match store.upsert(entry).await {
            Ok(()) => summary.successes += 1,
            Err(error) => {
                summary.failures += 1;
                error!(?error, row, "upsert failed");
            }
        }
    }

    info!(
        rows = summary.rows,
        successes = summary.successes,
        parse_skipped = summary.parse_skipped,
        failures = summary.failures,
        "upsert pass finished"
    );
    Ok(summary)
}
