//! Error types for the transcript embedding CLI.

use thiserror::Error;

/// Errors related to embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("no embedding API key: set OPENAI_API_KEY or embedding.api_key in the config file")]
    MissingApiKey,

    #[error("failed to connect to embedding service: {0}")]
    ConnectionError(String),

    #[error("embedding service error: {0}")]
    ServerError(String),

    #[error("embedding request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("embedding timeout")]
    Timeout,
}

/// Errors related to vector store operations.
#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("no vector store API key: set PINECONE_API_KEY or vector_store.api_key in the config file")]
    MissingApiKey,

    #[error("failed to connect to vector store: {0}")]
    ConnectionError(String),

    #[error("project lookup error: {0}")]
    ProjectError(String),

    #[error("index error: {0}")]
    IndexError(String),

    #[error("upsert error: {0}")]
    UpsertError(String),

    #[error("query error: {0}")]
    QueryError(String),

    #[error("fetch error: {0}")]
    FetchError(String),

    #[error("vector store request failed: {0}")]
    RequestError(#[from] reqwest::Error),
}

/// Errors related to the CSV embedding file.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("row {row}, column {column}: invalid float: {source}")]
    FloatParse {
        row: usize,
        column: usize,
        source: std::num::ParseFloatError,
    },

    #[error("row {0}: no vector values")]
    EmptyRow(usize),
}

/// Errors related to configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("path error: {0}")]
    PathError(String),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Application-level errors that wrap domain errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector store error: {0}")]
    VectorStore(#[from] VectorStoreError),

    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("{0}")]
    Other(String),
}
