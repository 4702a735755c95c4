//! Error types for form checkbox extraction

use thiserror::Error;

/// Result type alias for form checkbox extraction
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for form checkbox extraction
///
/// These are the fatal, whole-run failures. Per-question problems (a missing
/// anchor, a region that falls off the page) are not errors; they surface as
/// absent checkbox reads and resolve to an undetectable answer.
#[derive(Error, Debug)]
pub enum Error {
    /// PDF file not found
    #[error("PDF not found: {path}")]
    PdfNotFound { path: String },

    /// Invalid PDF file
    #[error("Invalid PDF file: {reason}")]
    InvalidPdf { reason: String },

    /// PDF is password protected and no password was provided
    #[error("PDF is password protected")]
    PasswordRequired,

    /// Section heading not found on any page of the document
    #[error("Section heading not found in document: {heading:?}")]
    SectionNotFound { heading: String },

    /// Template failed validation
    #[error("Invalid template: {reason}")]
    InvalidTemplate { reason: String },

    /// PDFium error
    #[error("PDFium error: {reason}")]
    Pdfium { reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
