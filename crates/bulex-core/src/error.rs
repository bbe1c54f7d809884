//! Error types for the bulex-core library.

use thiserror::Error;

/// Main error type for the bulex library.
#[derive(Error, Debug)]
pub enum BulexError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Payslip extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Learning-state persistence error.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to payslip field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Required field is missing.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Field validation failed.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Failed to parse a value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },
}

/// Errors related to persisted learning state.
///
/// Pattern synthesis and scoring never raise; a store that cannot be read or
/// written is the one failure in the learning path that must reach the caller,
/// otherwise corrections are silently lost.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Failed to read a persisted collection.
    #[error("failed to load {collection}: {source}")]
    Load {
        collection: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a persisted collection.
    #[error("failed to save {collection}: {source}")]
    Save {
        collection: String,
        #[source]
        source: std::io::Error,
    },

    /// A persisted collection exists but cannot be decoded.
    #[error("corrupt {collection}: {reason}")]
    Corrupt { collection: String, reason: String },
}

/// Result type for the bulex library.
pub type Result<T> = std::result::Result<T, BulexError>;
