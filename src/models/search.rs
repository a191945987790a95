//! Search-related models for queries and results.

use serde::{Deserialize, Serialize};

/// Output format for summaries and search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// Machine-parseable JSON format
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// A single nearest-neighbor hit, ready for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Vector identifier in the index
    pub id: String,

    /// Similarity score reported by the index
    pub score: f32,

    /// Original message text, when stored as metadata
    pub text: Option<String>,

    /// Stored vector values, fetched by id or taken from the match itself
    pub values: Vec<f32>,
}

impl SearchHit {
    /// Dimension of the fetched vector, zero when unavailable.
    pub fn dimension(&self) -> usize {
        self.values.len()
    }
}

/// Hits for one query iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHits {
    /// Query text that was embedded
    pub query: String,

    /// Matching hits, best first
    pub hits: Vec<SearchHit>,

    /// Query execution time in milliseconds
    pub duration_ms: u64,
}

impl SearchHits {
    /// Create a new hit container.
    pub fn new(query: String, hits: Vec<SearchHit>, duration_ms: u64) -> Self {
        Self {
            query,
            hits,
            duration_ms,
        }
    }

    /// Check if there are no hits.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Get the number of hits.
    pub fn len(&self) -> usize {
        self.hits.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_search_hits() {
        let hits = SearchHits::new("test".to_string(), vec![], 50);
        assert!(hits.is_empty());
        assert_eq!(hits.duration_ms, 50);
    }

    #[test]
    fn test_hit_dimension() {
        let hit = SearchHit {
            id: "vector_id_1".to_string(),
            score: 0.9,
            text: None,
            values: vec![0.1, 0.2, 0.3],
        };
        assert_eq!(hit.dimension(), 3);
    }
}
