//! The embedding record shared between the embed and upsert passes.

/// One CSV row: the message text followed by its embedding values.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingRecord {
    /// Message text extracted from the transcript
    pub text: String,

    /// Embedding values, one float per CSV column
    pub values: Vec<f32>,
}

impl EmbeddingRecord {
    /// Create a new record.
    pub fn new(text: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            values,
        }
    }

    /// Dimension of the stored vector.
    pub fn dimension(&self) -> usize {
        self.values.len()
    }
}
