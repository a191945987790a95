use serde::{Deserialize, Serialize};

use super::search::OutputFormat;

pub const DEFAULT_EMBEDDING_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_ENVIRONMENT: &str = "gcp-starter";
pub const DEFAULT_INDEX: &str = "whatsapp-chat";
pub const DEFAULT_DIMENSION: usize = 1536;
pub const DEFAULT_METRIC: &str = "cosine";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_LOG_FILE: &str = "chatvec.log";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    #[serde(default)]
    pub transcript: TranscriptConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join("chatvec").join("config.toml"))
    }

    pub fn load() -> Result<Self, crate::error::ConfigError> {
        let mut config = Self::default();
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            let content = std::fs::read_to_string(&path)?;
            config = toml::from_str(&content)?;
        }
        config.apply_env();
        Ok(config)
    }

    pub fn save(&self) -> Result<(), crate::error::ConfigError> {
        let path = Self::config_path().ok_or_else(|| {
            crate::error::ConfigError::PathError("could not determine config directory".to_string())
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Environment variables take precedence over file values for secrets.
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY")
            && !key.is_empty()
        {
            self.embedding.api_key = Some(key);
        }
        if let Ok(key) = std::env::var("PINECONE_API_KEY")
            && !key.is_empty()
        {
            self.vector_store.api_key = Some(key);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_url")]
    pub url: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_embedding_url() -> String {
    DEFAULT_EMBEDDING_URL.to_string()
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            url: default_embedding_url(),
            model: default_embedding_model(),
            timeout_secs: default_timeout(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default = "default_index")]
    pub index: String,

    #[serde(default = "default_dimension")]
    pub dimension: usize,

    #[serde(default = "default_metric")]
    pub metric: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override for the control-plane base URL (gateways, tests).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller_url: Option<String>,

    /// Override for the data-plane base URL (gateways, tests).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

fn default_index() -> String {
    DEFAULT_INDEX.to_string()
}

fn default_dimension() -> usize {
    DEFAULT_DIMENSION
}

fn default_metric() -> String {
    DEFAULT_METRIC.to_string()
}

impl VectorStoreConfig {
    /// Control-plane base URL for index management and project lookup.
    pub fn controller_url(&self) -> String {
        match &self.controller_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://controller.{}.pinecone.io", self.environment),
        }
    }

    /// Data-plane base URL; the project id comes from a who-am-i lookup.
    pub fn data_url(&self, project: &str) -> String {
        match &self.data_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!(
                "https://{}-{}.svc.{}.pinecone.io",
                self.index, project, self.environment
            ),
        }
    }
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            index: default_index(),
            dimension: default_dimension(),
            metric: default_metric(),
            timeout_secs: default_timeout(),
            api_key: None,
            controller_url: None,
            data_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: std::path::PathBuf,
}

fn default_data_dir() -> std::path::PathBuf {
    std::path::PathBuf::from(DEFAULT_DATA_DIR)
}

impl TranscriptConfig {
    /// Transcript input for a language, e.g. `./data/en_chat.txt`.
    pub fn chat_file(&self, lang: super::language::Language) -> std::path::PathBuf {
        self.data_dir.join(format!("{lang}_chat.txt"))
    }

    /// Stem for embedding CSV files of a language, without timestamp suffix.
    pub fn embeddings_stem(&self, lang: super::language::Language) -> String {
        format!("{lang}_embeddings")
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default)]
    pub default_format: OutputFormat,
}

fn default_top_k() -> usize {
    1
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            default_format: OutputFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub file: std::path::PathBuf,

    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_file() -> std::path::PathBuf {
    std::path::PathBuf::from(DEFAULT_LOG_FILE)
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::language::Language;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.embedding.url, DEFAULT_EMBEDDING_URL);
        assert_eq!(config.embedding.model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(config.vector_store.environment, DEFAULT_ENVIRONMENT);
        assert_eq!(config.vector_store.index, DEFAULT_INDEX);
        assert_eq!(config.vector_store.dimension, DEFAULT_DIMENSION);
        assert_eq!(config.vector_store.metric, DEFAULT_METRIC);
        assert_eq!(config.search.top_k, 1);
    }

    #[test]
    fn test_config_path() {
        let path = Config::config_path();
        assert!(path.is_some());
    }

    #[test]
    fn test_controller_url_from_environment() {
        let config = VectorStoreConfig::default();
        assert_eq!(
            config.controller_url(),
            "https://controller.gcp-starter.pinecone.io"
        );
    }

    #[test]
    fn test_controller_url_override() {
        let config = VectorStoreConfig {
            controller_url: Some("http://localhost:9000/".to_string()),
            ..Default::default()
        };
        assert_eq!(config.controller_url(), "http://localhost:9000");
    }

    #[test]
    fn test_data_url_from_project() {
        let config = VectorStoreConfig::default();
        assert_eq!(
            config.data_url("abc123"),
            "https://whatsapp-chat-abc123.svc.gcp-starter.pinecone.io"
        );
    }

    #[test]
    fn test_transcript_paths() {
        let config = TranscriptConfig::default();
        assert_eq!(
            config.chat_file(Language::En),
            std::path::PathBuf::from("./data/en_chat.txt")
        );
        assert_eq!(config.embeddings_stem(Language::He), "he_embeddings");
    }
}
