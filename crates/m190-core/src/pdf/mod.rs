//! Page text sources for the extractor.
//!
//! Extraction works on plain text, one string per page. This module turns a
//! PDF declaration, or a text dump with form-feed page breaks, into that
//! sequence.

mod extractor;

pub use extractor::PdfExtractor;

use std::path::Path;

use tracing::debug;

use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Page separator written by `pdftotext` and similar tools.
pub const PAGE_BREAK: char = '\u{000C}';

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;

    /// Extract the text of every page, in page order.
    fn extract_pages(&self) -> Result<Vec<String>>;
}

/// Split a text dump into pages at form-feed characters.
///
/// A trailing form feed does not start an extra empty page.
pub fn split_text_pages(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text.split(PAGE_BREAK).map(str::to_string).collect();
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages
}

/// Read the page texts of a declaration file.
///
/// `.txt` files are split at form feeds; everything else is loaded as PDF.
/// Blank pages stay in place as empty entries so that positions match the
/// physical pages. The page count is capped at `config.max_pages` when that
/// is non-zero.
pub fn read_pages(path: &Path, config: &PdfConfig) -> crate::Result<Vec<String>> {
    let is_text = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"));

    let mut pages = if is_text {
        split_text_pages(&std::fs::read_to_string(path)?)
    } else {
        let data = std::fs::read(path)?;
        let mut extractor = PdfExtractor::new();
        extractor.load(&data)?;
        extractor.extract_pages()?
    };

    if config.max_pages > 0 {
        pages.truncate(config.max_pages);
    }

    debug!("Read {} pages from {}", pages.len(), path.display());
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_text_pages() {
        assert_eq!(split_text_pages("a\u{000C}b\u{000C}"), vec!["a", "b"]);
        assert_eq!(split_text_pages("single"), vec!["single"]);
        assert_eq!(split_text_pages(""), vec![""]);
        assert_eq!(split_text_pages("a\u{000C}\u{000C}c"), vec!["a", "", "c"]);
    }

    #[test]
    fn test_read_pages_from_text_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.txt");
        std::fs::write(&path, "one\u{000C}  \u{000C}three\u{000C}four").unwrap();

        let pages = read_pages(&path, &PdfConfig::default()).unwrap();
        assert_eq!(pages, vec!["one", "  ", "three", "four"]);

        let pages = read_pages(&path, &PdfConfig { max_pages: 2 }).unwrap();
        assert_eq!(pages, vec!["one", "  "]);
    }

    #[test]
    fn test_read_pages_rejects_garbage_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf").unwrap();

        let err = read_pages(&path, &PdfConfig::default()).unwrap_err();
        assert!(matches!(err, crate::M190Error::Pdf(PdfError::Parse(_))));
    }
}
