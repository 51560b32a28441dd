//! Error types for the m190-core library.
//!
//! Data-shape problems inside a declaration (missing fields, malformed
//! amounts, blocks that are not recipients) never surface here; they degrade
//! to zero or absent values during extraction. Only failures to obtain the
//! page text or the configuration are errors.

use thiserror::Error;

/// Main error type for the m190 library.
#[derive(Error, Debug)]
pub enum M190Error {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to reading page text out of a PDF.
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

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`crate::M190Config`].
    #[error("invalid configuration: {0}")]
    Format(#[from] serde_json::Error),

    /// A configured caption could not be turned into a search pattern.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A configured value is out of range.
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Result type for the m190 library.
pub type Result<T> = std::result::Result<T, M190Error>;
