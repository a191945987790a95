use anyhow::Result;
use clap::Args;

use crate::cli::output::{StatusInfo, get_formatter};
use crate::models::{Config, Language, OutputFormat};
use crate::services::{VectorStoreClient, latest_embedding_file};

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Transcript language, selects which embeddings file to report
    #[arg(long, short = 'l', default_value = "en")]
    pub lang: Language,
}

pub async fn handle_status(args: StatusArgs, format: OutputFormat, _verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let (project, index_exists) = match VectorStoreClient::new(&config.vector_store) {
        Ok(store) => match store.project().await {
            Ok(project) => {
                let exists = store.index_exists().await.ok();
                (Some(project.to_string()), exists)
            }
            Err(_) => (None, None),
        },
        Err(_) => (None, None),
    };

    let embeddings_file = latest_embedding_file(
        &config.transcript.data_dir,
        &config.transcript.embeddings_stem(args.lang),
    )
    .unwrap_or(None);

    let status = StatusInfo {
        embedding_url: config.embedding.url.clone(),
        embedding_model: config.embedding.model.clone(),
        environment: config.vector_store.environment.clone(),
        project,
        index: config.vector_store.index.clone(),
        index_exists,
        dimension: config.vector_store.dimension,
        metric: config.vector_store.metric.clone(),
        embeddings_file,
    };

    print!("{}", formatter.format_status(&status));

    if status.project.is_none() {
        eprintln!();
        eprintln!("Hint: could not reach the vector store controller.");
        eprintln!("      Check PINECONE_API_KEY and the configured environment.");
    }

    Ok(())
}
