//! Ordinal-position field resolution.
//!
//! A Modelo 190 recipient block prints the same caption more than once for
//! different rows: "Percepción íntegra" appears for ordinary income and again
//! for irregular income, and so does "Valoración". The page text carries no
//! structure that tells the rows apart, so the occurrence number of the
//! caption inside the block is what identifies the field.
//!
//! Layout drift shows up here first: if a new form version adds or removes a
//! row, the N-th occurrence silently points at a different field.

use rust_decimal::Decimal;

use super::amounts::normalize_amount;
use super::patterns::AMOUNT_PATTERN;
use super::{ExtractionMatch, FieldExtractor};

/// Characters scanned after a caption when looking for its amount.
pub const DEFAULT_LOOKAHEAD_CHARS: usize = 200;

/// A field identified by its caption and the caption's occurrence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdinalField<'a> {
    /// Literal caption text.
    pub label: &'a str,
    /// 1-based occurrence of the caption.
    pub instance: usize,
    /// Size of the window, in characters, starting at the caption.
    pub lookahead_chars: usize,
}

impl<'a> OrdinalField<'a> {
    pub fn new(label: &'a str, instance: usize) -> Self {
        Self {
            label,
            instance,
            lookahead_chars: DEFAULT_LOOKAHEAD_CHARS,
        }
    }

    pub fn with_lookahead(mut self, chars: usize) -> Self {
        self.lookahead_chars = chars;
        self
    }

    /// Find the amount belonging to this field in `block`.
    ///
    /// Returns `None` when the caption occurs fewer than `instance` times or
    /// when no amount follows it inside the window.
    pub fn locate(&self, block: &str) -> Option<ExtractionMatch<Decimal>> {
        if self.instance == 0 || self.label.is_empty() {
            return None;
        }

        let (start, _) = block.match_indices(self.label).nth(self.instance - 1)?;
        self.amount_at(block, start)
    }

    fn amount_at(&self, block: &str, start: usize) -> Option<ExtractionMatch<Decimal>> {
        let window = lookahead_window(&block[start..], self.lookahead_chars);
        let m = AMOUNT_PATTERN.find(window)?;

        Some(
            ExtractionMatch::new(normalize_amount(m.as_str()), m.as_str())
                .with_position(start + m.start(), start + m.end()),
        )
    }
}

impl FieldExtractor for OrdinalField<'_> {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.locate(text)
    }

    /// Amount following every occurrence of the caption, in order.
    ///
    /// Useful to see which occurrence carries which number when a layout
    /// changes.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        if self.label.is_empty() {
            return Vec::new();
        }

        text.match_indices(self.label)
            .filter_map(|(start, _)| self.amount_at(text, start))
            .collect()
    }
}

/// The first `chars` characters of `text`, cut on a character boundary.
fn lookahead_window(text: &str, chars: usize) -> &str {
    let end = text
        .char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    &text[..end]
}

/// Amount after the `n`-th occurrence of `label`, or `None` if absent.
pub fn locate_nth_amount(block: &str, label: &str, n: usize) -> Option<Decimal> {
    OrdinalField::new(label, n).locate(block).map(|m| m.value)
}

/// Amount after the `n`-th occurrence of `label`, zero if absent.
pub fn find_nth_amount(block: &str, label: &str, n: usize) -> Decimal {
    locate_nth_amount(block, label, n).unwrap_or(Decimal::ZERO)
}
