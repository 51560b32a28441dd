//! Recipient block segmentation.

use regex::Regex;

use super::patterns::{RECIPIENT_MARKER, recipient_marker};

/// Text span of one recipient ("perceptor") on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipientBlock<'a> {
    /// Ordinal printed in the marker ("Percepción 3" -> 3).
    pub ordinal: Option<u32>,
    /// Position of the block on its page (0-indexed).
    pub index: usize,
    /// Text between this marker and the next one (or the end of the page).
    pub text: &'a str,
}

/// Splits page text at the recipient ordinal marker.
#[derive(Debug, Clone)]
pub struct RecipientSegmenter {
    marker: Regex,
}

impl RecipientSegmenter {
    /// Segmenter for the standard "Percepción N" marker.
    pub fn new() -> Self {
        Self {
            marker: (*RECIPIENT_MARKER).clone(),
        }
    }

    /// Segmenter for a different caption word followed by an ordinal.
    pub fn with_marker(word: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            marker: recipient_marker(word)?,
        })
    }

    /// Split `page_text` into recipient blocks, in page order.
    ///
    /// Text before the first marker is page header and never a recipient.
    /// Blocks are not validated here; a block without a recipient identity
    /// is dropped by the caller.
    pub fn segment<'a>(&self, page_text: &'a str) -> Vec<RecipientBlock<'a>> {
        let markers: Vec<(usize, usize, Option<u32>)> = self
            .marker
            .captures_iter(page_text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let ordinal = caps.get(1).and_then(|m| m.as_str().parse().ok());
                Some((whole.start(), whole.end(), ordinal))
            })
            .collect();

        markers
            .iter()
            .enumerate()
            .map(|(index, &(_, end, ordinal))| {
                let next_start = markers
                    .get(index + 1)
                    .map(|&(start, _, _)| start)
                    .unwrap_or(page_text.len());
                RecipientBlock {
                    ordinal,
                    index,
                    text: &page_text[end..next_start],
                }
            })
            .collect()
    }
}

impl Default for RecipientSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Split page text into recipient blocks using the standard marker.
pub fn segment_recipients(page_text: &str) -> Vec<RecipientBlock<'_>> {
    RecipientSegmenter::new().segment(page_text)
}
