mod embedding;
mod pipeline;
mod sink;
mod transcript;
mod vector_store;

pub use embedding::EmbeddingClient;
pub use pipeline::{EmbedSummary, UpsertSummary, run_embed_pass, run_upsert_pass};
pub use sink::{CsvSink, CsvSource, latest_embedding_file, timestamped_path};
pub use transcript::TranscriptParser;
pub use vector_store::{
    FetchedVector, IndexState, QueryMatch, SparseValues, VectorEntry, VectorStoreClient,
};
