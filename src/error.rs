//! Error handling for the career compass application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CareerCompassError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Text processing error: {0}")]
    TextProcessing(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Duplicate career name in table: {0}")]
    DuplicateCareer(String),

    #[error("Unknown career: {0}")]
    UnknownCareer(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, CareerCompassError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for CareerCompassError {
    fn from(err: anyhow::Error) -> Self {
        CareerCompassError::Processing(err.to_string())
    }
}
