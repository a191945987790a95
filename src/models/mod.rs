mod config;
mod language;
mod record;
mod search;

pub use config::{
    Config, DEFAULT_DATA_DIR, DEFAULT_DIMENSION, DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_URL,
    DEFAULT_ENVIRONMENT, DEFAULT_INDEX, DEFAULT_LOG_FILE, DEFAULT_METRIC, EmbeddingConfig,
    LoggingConfig, SearchConfig, TranscriptConfig, VectorStoreConfig,
};
pub use language::Language;
pub use record::EmbeddingRecord;
pub use search::{OutputFormat, SearchHit, SearchHits};
