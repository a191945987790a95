use std::fmt::Write as FmtWrite;
use std::path::PathBuf;

use crate::models::{OutputFormat, SearchHits};
use crate::services::{EmbedSummary, UpsertSummary};

pub trait Formatter {
    fn format_hits(&self, hits: &SearchHits) -> String;
    fn format_embed_summary(&self, summary: &EmbedSummary) -> String;
    fn format_upsert_summary(&self, summary: &UpsertSummary) -> String;
    fn format_status(&self, status: &StatusInfo) -> String;
    fn format_message(&self, message: &str) -> String;
    fn format_error(&self, error: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub embedding_url: String,
    pub embedding_model: String,
    pub environment: String,
    pub project: Option<String>,
    pub index: String,
    pub index_exists: Option<bool>,
    pub dimension: usize,
    pub metric: String,
    pub embeddings_file: Option<PathBuf>,
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_hits(&self, hits: &SearchHits) -> String {
        if hits.is_empty() {
            return format!("No matches found for: {}\n", hits.query);
        }

        let mut output = String::new();
        writeln!(output, "Nearest matches for: \"{}\"", hits.query).unwrap();
        writeln!(
            output,
            "Found {} matches in {}ms\n",
            hits.len(),
            hits.duration_ms
        )
        .unwrap();

        for (i, hit) in hits.hits.iter().enumerate() {
            writeln!(output, "{}. [Score: {:.3}] {}", i + 1, hit.score, hit.id).unwrap();
            writeln!(output, "   Vector: {} values", hit.dimension()).unwrap();
            match hit.text {
                Some(ref text) => writeln!(output, "   {}", text).unwrap(),
                None => writeln!(output, "   (no stored text)").unwrap(),
            }
            writeln!(output).unwrap();
        }

        output
    }

    fn format_embed_summary(&self, summary: &EmbedSummary) -> String {
        let mut output = String::new();
        writeln!(output, "Embed Pass Complete").unwrap();
        writeln!(output, "-------------------").unwrap();
        writeln!(output, "Lines read: {}", summary.lines).unwrap();
        writeln!(output, "Messages embedded: {}", summary.successes).unwrap();
        writeln!(output, "Parse failures: {}", summary.parse_failures).unwrap();
        writeln!(output, "Embedding failures: {}", summary.embedding_failures).unwrap();
        writeln!(output, "Write failures: {}", summary.write_failures).unwrap();
        output
    }

    fn format_upsert_summary(&self, summary: &UpsertSummary) -> String {
        let mut output = String::new();
        writeln!(output, "Upsert Pass Complete").unwrap();
        writeln!(output, "--------------------").unwrap();
        writeln!(output, "Rows read: {}", summary.rows).unwrap();
        writeln!(output, "Vectors upserted: {}", summary.successes).unwrap();
        writeln!(output, "Rows skipped: {}", summary.parse_skipped).unwrap();
        writeln!(output, "Upsert failures: {}", summary.failures).unwrap();
        output
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        let mut output = String::new();
        writeln!(output, "Status").unwrap();
        writeln!(output, "------").unwrap();

        writeln!(output, "Embedding Service").unwrap();
        writeln!(output, "  URL:         {}", status.embedding_url).unwrap();
        writeln!(output, "  Model:       {}", status.embedding_model).unwrap();
        writeln!(output).unwrap();

        let store_status = if status.project.is_some() {
            "[CONNECTED]"
        } else {
            "[DISCONNECTED]"
        };
        writeln!(output, "Vector Store:  {}", store_status).unwrap();
        writeln!(output, "  Environment: {}", status.environment).unwrap();
        if let Some(ref project) = status.project {
            writeln!(output, "  Project:     {}", project).unwrap();
        }
        let index_suffix = match status.index_exists {
            Some(true) => " [EXISTS]",
            Some(false) => " [MISSING]",
            None => "",
        };
        writeln!(output, "  Index:       {}{}", status.index, index_suffix).unwrap();
        writeln!(output, "  Dimension:   {}", status.dimension).unwrap();
        writeln!(output, "  Metric:      {}", status.metric).unwrap();
        writeln!(output).unwrap();

        match status.embeddings_file {
            Some(ref path) => writeln!(output, "Embeddings:    {}", path.display()).unwrap(),
            None => writeln!(output, "Embeddings:    (none yet)").unwrap(),
        }

        output
    }

    fn format_message(&self, message: &str) -> String {
        format!("{}\n", message)
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}\n", error)
    }
}

pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render(&self, value: &serde_json::Value) -> String {
        if self.pretty {
            serde_json::to_string_pretty(value)
                .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        } else {
            serde_json::to_string(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
    }
}

impl Formatter for JsonFormatter {
    fn format_hits(&self, hits: &SearchHits) -> String {
        if self.pretty {
            serde_json::to_string_pretty(hits)
                .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        } else {
            serde_json::to_string(hits).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
    }

    fn format_embed_summary(&self, summary: &EmbedSummary) -> String {
        let json = serde_json::json!({
            "lines": summary.lines,
            "successes": summary.successes,
            "parse_failures": summary.parse_failures,
            "embedding_failures": summary.embedding_failures,
            "write_failures": summary.write_failures,
        });
        self.render(&json)
    }

    fn format_upsert_summary(&self, summary: &UpsertSummary) -> String {
        let json = serde_json::json!({
            "rows": summary.rows,
            "successes": summary.successes,
            "parse_skipped": summary.parse_skipped,
            "failures": summary.failures,
        });
        self.render(&json)
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        let json = serde_json::json!({
            "embedding": {
                "url": status.embedding_url,
                "model": status.embedding_model,
            },
            "vector_store": {
                "environment": status.environment,
                "connected": status.project.is_some(),
                "project": status.project,
                "index": status.index,
                "index_exists": status.index_exists,
                "dimension": status.dimension,
                "metric": status.metric,
            },
            "embeddings_file": status.embeddings_file,
        });
        self.render(&json)
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({"message": message}).to_string()
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({"error": error}).to_string()
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}
