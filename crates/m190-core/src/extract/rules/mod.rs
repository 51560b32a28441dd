//! Rule-based extractors for Modelo 190 page text.

pub mod amounts;
pub mod identity;
pub mod locator;
pub mod patterns;
pub mod segment;

pub use amounts::{format_spanish_amount, normalize_amount};
pub use identity::{RecipientIdentity, parse_identity};
pub use locator::{DEFAULT_LOOKAHEAD_CHARS, OrdinalField, find_nth_amount, locate_nth_amount};
pub use segment::{RecipientBlock, RecipientSegmenter, segment_recipients};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in text together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range of the matched text in the searched block.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
