//! CSV persistence for embedding records.
//!
//! One row per message: the text column first, then one float per
//! dimension. Files are named `<stem>-<timestamp>.csv` so every embed run
//! writes a fresh file; readers pick the newest one by name.

use chrono::Local;
use csv::{ReaderBuilder, Writer, WriterBuilder};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::SinkError;
use crate::models::EmbeddingRecord;

/// Appends embedding records to a CSV file.
pub struct CsvSink {
    writer: Writer<File>,
    path: PathBuf,
}

impl CsvSink {
    /// Create the output file, truncating any previous content.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let path = path.into();
        let file = File::create(&path)?;
        Ok(Self {
            writer: WriterBuilder::new().flexible(true).from_writer(file),
            path,
        })
    }

    /// Append one record as a CSV row.
    pub fn append(&mut self, record: &EmbeddingRecord) -> Result<(), SinkError> {
        let mut row = Vec::with_capacity(record.values.len() + 1);
        row.push(record.text.clone());
        row.extend(record.values.iter().map(|v| v.to_string()));
        self.writer.write_record(&row)?;
        Ok(())
    }

    /// Flush buffered rows to disk.
    pub fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Path of the file being written.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Streams embedding records back out of a CSV file.
pub struct CsvSource {
    reader: csv::Reader<File>,
}

impl CsvSource {
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        let file = File::open(path)?;
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);
        Ok(Self { reader })
    }

    /// Iterate rows in file order as `(ordinal, decode result)` pairs.
    ///
    /// Ordinals are 1-based. A decode failure covers the whole row; the
    /// caller decides whether to skip or abort.
    pub fn rows(self) -> impl Iterator<Item = (usize, Result<EmbeddingRecord, SinkError>)> {
        self.reader.into_records().enumerate().map(|(idx, result)| {
            let row = idx + 1;
            let record = match result {
                Ok(record) => parse_row(row, &record),
                Err(e) => Err(SinkError::CsvError(e)),
            };
            (row, record)
        })
    }
}

fn parse_row(row: usize, record: &csv::StringRecord) -> Result<EmbeddingRecord, SinkError> {
    let mut fields = record.iter();
    let text = fields.next().unwrap_or("").to_string();

    let mut values = Vec::with_capacity(record.len().saturating_sub(1));
    for (column, field) in fields.enumerate() {
        let value = field.parse::<f32>().map_err(|source| SinkError::FloatParse {
            row,
            // 1-based, counting the text column
            column: column + 2,
            source,
        })?;
        values.push(value);
    }

    if values.is_empty() {
        return Err(SinkError::EmptyRow(row));
    }

    Ok(EmbeddingRecord { text, values })
}

/// Output path for a new embed run: `<data_dir>/<stem>-<timestamp>.csv`.
pub fn timestamped_path(data_dir: &Path, stem: &str) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d-%H%M%S");
    data_dir.join(format!("{stem}-{timestamp}.csv"))
}

/// Newest embedding file for a stem, by the sortable timestamp in the name.
pub fn latest_embedding_file(
    data_dir: &Path,
    stem: &str,
) -> Result<Option<PathBuf>, SinkError> {
    let prefix = format!("{stem}-");
    let mut newest: Option<PathBuf> = None;

    for entry in std::fs::read_dir(data_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.starts_with(&prefix) || !name.ends_with(".csv") {
            continue;
        }
        let path = entry.path();
        if newest.as_ref().is_none_or(|best| path > *best) {
            newest = Some(path);
        }
    }

    Ok(newest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip_preserves_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let records = vec![
            EmbeddingRecord::new("Hello world!", vec![0.12345678, -3.25, 1e-7]),
            EmbeddingRecord::new("he said \"hi\", twice", vec![0.5, 0.25]),
        ];

        let mut sink = CsvSink::create(&path).unwrap();
        for record in &records {
            sink.append(record).unwrap();
        }
        sink.flush().unwrap();

        let read: Vec<EmbeddingRecord> = CsvSource::open(&path)
            .unwrap()
            .rows()
            .map(|(_, r)| r.unwrap())
            .collect();
        assert_eq!(read, records);
    }

    #[test]
    fn test_float_parse_failure_names_row_and_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        std::fs::write(&path, "good,0.5,0.25\nbad,oops,0.25\nalso good,1.0,2.0\n").unwrap();

        let rows: Vec<_> = CsvSource::open(&path).unwrap().rows().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].1.is_ok());
        match &rows[1].1 {
            Err(SinkError::FloatParse { row, column, .. }) => {
                assert_eq!(*row, 2);
                assert_eq!(*column, 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(rows[2].1.is_ok());
    }

    #[test]
    fn test_text_only_row_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        std::fs::write(&path, "just text\n").unwrap();

        let rows: Vec<_> = CsvSource::open(&path).unwrap().rows().collect();
        assert_eq!(rows.len(), 1);
        assert!(matches!(rows[0].1, Err(SinkError::EmptyRow(1))));
    }

    #[test]
    fn test_timestamped_path_shape() {
        let path = timestamped_path(Path::new("/tmp/data"), "en_embeddings");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("en_embeddings-"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn test_latest_embedding_file_picks_newest() {
        let dir = tempdir().unwrap();
        for name in [
            "en_embeddings-20240101-000000.csv",
            "en_embeddings-20250101-120000.csv",
            "he_embeddings-20260101-000000.csv",
            "en_chat.txt",
        ] {
            std::fs::write(dir.path().join(name), "x,1.0\n").unwrap();
        }

        let newest = latest_embedding_file(dir.path(), "en_embeddings")
            .unwrap()
            .unwrap();
        assert_eq!(
            newest.file_name().unwrap().to_str().unwrap(),
            "en_embeddings-20250101-120000.csv"
        );
    }

    #[test]
    fn test_latest_embedding_file_empty_dir() {
        let dir = tempdir().unwrap();
        assert!(
            latest_embedding_file(dir.path(), "en_embeddings")
                .unwrap()
                .is_none()
        );
    }
}
