//! Core library for Modelo 190 withholding declarations.
//!
//! This crate provides:
//! - Page text loading from PDF declarations (lopdf + pdf-extract)
//! - Recipient ("perceptor") block segmentation and identity parsing
//! - Ordinal-position resolution of amounts that share a caption
//! - Declarant (filer) identification through an ordered strategy chain
//! - Recipient record models ready for tabular export

pub mod error;
pub mod extract;
pub mod models;
pub mod pdf;

pub use error::{ConfigError, M190Error, PdfError, Result};
pub use extract::{
    DocumentExtraction, ExtractionReport, Modelo190Parser, extract_declarant, extract_document,
    extract_document_into,
};
pub use models::config::M190Config;
pub use models::record::{AmountField, DeclarantIdentity, RecipientRecord};
pub use pdf::{PdfExtractor, PdfProcessor, read_pages, split_text_pages};
