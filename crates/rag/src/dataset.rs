//! Dataset loading and normalization.
//!
//! Converts an uploaded file (tabular CSV, tabular JSON, or line-delimited
//! text) into a uniform in-memory tabular representation that the indexer
//! consumes.

use ragchat_core::{AppError, AppResult};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Supported upload file types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Csv,
    Json,
    Txt,
}

impl FileType {
    /// Parse a declared type tag (file extension without the dot).
    ///
    /// Any tag outside the supported set fails with `UnsupportedFormat`,
    /// signaling the caller to abort before any indexing work begins.
    pub fn from_tag(tag: &str) -> AppResult<Self> {
        match tag.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "txt" => Ok(Self::Txt),
            other => Err(AppError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Detect the file type from a path's extension.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| AppError::UnsupportedFormat(path.display().to_string()))?;

        Self::from_tag(extension)
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Txt => "txt",
        }
    }
}

/// An ordered sequence of rows under a fixed column schema.
///
/// Invariant: every row has exactly one value per column, and column order
/// is stable for the lifetime of the dataset. A column literally named
/// `text` is treated as the canonical text source during document
/// extraction.
#[derive(Debug, Clone)]
pub struct TabularDataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TabularDataset {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Column names in their original order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in their original order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has zero rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Load a dataset from a reader according to its declared file type.
///
/// Row count equals the number of input records: CSV data rows, JSON
/// records, or non-empty text lines.
pub fn load_dataset<R: Read>(reader: R, file_type: FileType) -> AppResult<TabularDataset> {
    tracing::info!("Loading dataset as {}", file_type.as_str());

    let dataset = match file_type {
        FileType::Csv => load_csv(reader)?,
        FileType::Json => load_json(reader)?,
        FileType::Txt => load_txt(reader)?,
    };

    tracing::info!(
        "Loaded dataset: {} rows, {} columns",
        dataset.len(),
        dataset.columns().len()
    );

    Ok(dataset)
}

/// Parse comma-delimited tabular data. The header row defines the columns.
fn load_csv<R: Read>(reader: R) -> AppResult<TabularDataset> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let columns: Vec<String> = csv_reader
        .headers()
        .map_err(|e| AppError::Serialization(format!("Failed to parse CSV header: {}", e)))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record =
            record.map_err(|e| AppError::Serialization(format!("Failed to parse CSV row: {}", e)))?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    Ok(TabularDataset::new(columns, rows))
}

/// Parse an array of flat JSON objects. Columns are the union of keys in
/// first-seen order; keys missing from a record render as empty values.
fn load_json<R: Read>(reader: R) -> AppResult<TabularDataset> {
    let records: Vec<serde_json::Map<String, serde_json::Value>> =
        serde_json::from_reader(reader).map_err(|e| {
            AppError::Serialization(format!("Failed to parse JSON records: {}", e))
        })?;

    let mut columns: Vec<String> = Vec::new();
    for record in &records {
        for key in record.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| record.get(column).map(json_value_to_string).unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(TabularDataset::new(columns, rows))
}

/// One row per non-empty line, trimmed of trailing whitespace, under a
/// single column named `text`.
fn load_txt<R: Read>(reader: R) -> AppResult<TabularDataset> {
    let mut rows = Vec::new();

    for line in BufReader::new(reader).lines() {
        let line = line?;
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            rows.push(vec![trimmed.to_string()]);
        }
    }

    Ok(TabularDataset::new(vec!["text".to_string()], rows))
}

/// Render a JSON value as a cell string. Strings are taken verbatim,
/// nulls become empty, everything else keeps its JSON rendering.
fn json_value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_from_tag() {
        assert_eq!(FileType::from_tag("csv").unwrap(), FileType::Csv);
        assert_eq!(FileType::from_tag("JSON").unwrap(), FileType::Json);
        assert_eq!(FileType::from_tag("txt").unwrap(), FileType::Txt);
    }

    #[test]
    fn test_file_type_unsupported_tag() {
        let err = FileType::from_tag("pdf").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_file_type_from_path() {
        assert_eq!(
            FileType::from_path(Path::new("data/notes.TXT")).unwrap(),
            FileType::Txt
        );
        assert!(FileType::from_path(Path::new("archive.tar.gz")).is_err());
        assert!(FileType::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_load_csv_row_count() {
        let input = "id,text\n1,first row\n2,second row\n3,third row\n";
        let dataset = load_dataset(input.as_bytes(), FileType::Csv).unwrap();

        assert_eq!(dataset.columns(), &["id".to_string(), "text".to_string()]);
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.rows()[1], vec!["2", "second row"]);
    }

    #[test]
    fn test_load_json_row_count() {
        let input = r#"[
            {"name": "alpha", "score": 1},
            {"name": "beta", "score": 2, "extra": "x"}
        ]"#;
        let dataset = load_dataset(input.as_bytes(), FileType::Json).unwrap();

        assert_eq!(dataset.len(), 2);
        // Union of keys in first-seen order
        assert_eq!(
            dataset.columns(),
            &["name".to_string(), "score".to_string(), "extra".to_string()]
        );
        // Missing key renders as empty
        assert_eq!(dataset.rows()[0], vec!["alpha", "1", ""]);
        assert_eq!(dataset.rows()[1], vec!["beta", "2", "x"]);
    }

    #[test]
    fn test_load_json_rejects_non_records() {
        let input = r#"["just", "strings"]"#;
        let err = load_dataset(input.as_bytes(), FileType::Json).unwrap_err();
        assert!(matches!(err, AppError::Serialization(_)));
    }

    #[test]
    fn test_load_txt_skips_empty_lines_and_trims() {
        let input = "What is the capital of France?  \n\nParis is beautiful.\t\n";
        let dataset = load_dataset(input.as_bytes(), FileType::Txt).unwrap();

        assert_eq!(dataset.columns(), &["text".to_string()]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows()[0][0], "What is the capital of France?");
        assert_eq!(dataset.rows()[1][0], "Paris is beautiful.");
    }

    #[test]
    fn test_load_txt_empty_input() {
        let dataset = load_dataset("".as_bytes(), FileType::Txt).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.columns().len(), 1);
    }

    #[test]
    fn test_column_index() {
        let input = "id,text\n1,hello\n";
        let dataset = load_dataset(input.as_bytes(), FileType::Csv).unwrap();
        assert_eq!(dataset.column_index("text"), Some(1));
        assert_eq!(dataset.column_index("missing"), None);
    }
}
