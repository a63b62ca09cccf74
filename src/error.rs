// Typed errors for the library side of the importer. The binary wraps these
// in `anyhow` at the UI seam, the same way it wraps transport failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header or from a short row.
    /// `row` is the 1-based data row (header excluded).
    #[error("missing required field '{column}' in row {row}")]
    MissingField { column: &'static str, row: usize },

    #[error("XML encoding error: {0}")]
    Xml(String),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
