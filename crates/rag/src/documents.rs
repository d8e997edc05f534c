//! Document extraction from tabular datasets.
//!
//! A document is one unit of retrievable text derived from one dataset row.

use crate::dataset::TabularDataset;

/// Column name treated as the canonical text source when present.
pub const TEXT_COLUMN: &str = "text";

/// One unit of retrievable text.
///
/// Documents carry their origin row position; they are created at load
/// time, never mutated, and discarded with the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Origin row position within the dataset
    pub row: usize,

    /// Raw text content
    pub text: String,
}

/// Extract one document per dataset row.
///
/// If a column literally named `text` exists, its values are used verbatim.
/// Otherwise every row is canonicalized wholesale into one string.
pub fn extract_documents(dataset: &TabularDataset) -> Vec<Document> {
    match dataset.column_index(TEXT_COLUMN) {
        Some(text_idx) => dataset
            .rows()
            .iter()
            .enumerate()
            .map(|(row, values)| Document {
                row,
                text: values[text_idx].clone(),
            })
            .collect(),
        None => dataset
            .rows()
            .iter()
            .enumerate()
            .map(|(row, values)| Document {
                row,
                text: canonicalize_row(dataset.columns(), values),
            })
            .collect(),
    }
}

/// Serialize a whole row into one string.
///
/// Fields are rendered as `column=value` pairs joined in dataset column
/// order. The order is stable across runs so embeddings stay reproducible
/// for the same input data.
pub fn canonicalize_row(columns: &[String], values: &[String]) -> String {
    columns
        .iter()
        .zip(values.iter())
        .map(|(column, value)| format!("{}={}", column, value))
        .collect::<Vec<_>>()
        .join(", ")
}
