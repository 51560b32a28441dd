//! Recipient and declarant extraction from Modelo 190 page text.

pub mod declarant;
mod parser;
pub mod rules;

pub use declarant::{DeclarantExtractor, LegalNameStrategy, TaxIdStrategy, extract_declarant};
pub use parser::{
    DocumentExtraction, ExtractionReport, Modelo190Parser, extract_document, extract_document_into,
};
