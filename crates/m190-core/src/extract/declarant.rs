//! Declarant (filer) identification.
//!
//! The declarant block of the summary page has no fixed layout in the
//! extracted text: captions and values land on the same line or on the
//! following ones depending on the PDF producer. Identification therefore
//! runs an ordered list of strategies for each piece. A strategy first checks
//! its anchor line; when the anchor is missing the next strategy is tried,
//! when the anchor exists its result is final, found or not.

use tracing::trace;

use crate::models::config::ExtractionConfig;
use crate::models::record::DeclarantIdentity;

use super::rules::patterns::{
    CAPTION_FRAGMENT, DECLARANT_TAX_ID, DECLARANT_TAX_ID_CAPTION, LEGAL_NAME_CAPTION, NAME_STOP_WORD,
    UPPERCASE_LETTER,
};

/// How to find the declarant's tax identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxIdStrategy {
    /// A line with a fiscal-identifier caption; the ID is on that line or
    /// the next one.
    CaptionLine,
    /// The first ID-shaped token within `lines` lines after any line
    /// mentioning "declarante".
    DeclarantWindow { lines: usize },
}

/// How to find the declarant's legal name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegalNameStrategy {
    /// The first plausible line within `lines` lines after the
    /// "razón social" caption.
    CaptionFollowing { lines: usize },
    /// The first line with uppercase letters within `lines` lines after a
    /// line reading just "declarante".
    BareHeading { lines: usize },
}

/// Result of running one strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    /// The strategy's anchor is not in the text.
    NotApplicable,
    /// The anchor was found but nothing after it qualified.
    Exhausted,
    Found(String),
}

/// Runs the tax-ID and legal-name strategy chains over a text.
#[derive(Debug, Clone)]
pub struct DeclarantExtractor {
    tax_id_strategies: Vec<TaxIdStrategy>,
    legal_name_strategies: Vec<LegalNameStrategy>,
}

impl DeclarantExtractor {
    /// Extractor with the standard strategy chains.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Extractor with window sizes taken from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            tax_id_strategies: vec![
                TaxIdStrategy::CaptionLine,
                TaxIdStrategy::DeclarantWindow {
                    lines: config.tax_id_window_lines,
                },
            ],
            legal_name_strategies: vec![
                LegalNameStrategy::CaptionFollowing {
                    lines: config.legal_name_window_lines,
                },
                LegalNameStrategy::BareHeading {
                    lines: config.heading_window_lines,
                },
            ],
        }
    }

    /// Replace the tax-ID strategy chain.
    pub fn with_tax_id_strategies(mut self, strategies: Vec<TaxIdStrategy>) -> Self {
        self.tax_id_strategies = strategies;
        self
    }

    /// Replace the legal-name strategy chain.
    pub fn with_legal_name_strategies(mut self, strategies: Vec<LegalNameStrategy>) -> Self {
        self.legal_name_strategies = strategies;
        self
    }

    /// Identify the declarant in `text`. Missing pieces are `None`.
    pub fn extract(&self, text: &str) -> DeclarantIdentity {
        let lines: Vec<&str> = text.lines().collect();

        let tax_id = run_chain(&self.tax_id_strategies, |strategy| {
            let outcome = match *strategy {
                TaxIdStrategy::CaptionLine => tax_id_from_caption(&lines),
                TaxIdStrategy::DeclarantWindow { lines: window } => {
                    tax_id_near_declarant(&lines, window)
                }
            };
            trace!("Tax ID strategy {:?}: {:?}", strategy, outcome);
            outcome
        });

        let legal_name = run_chain(&self.legal_name_strategies, |strategy| {
            let outcome = match *strategy {
                LegalNameStrategy::CaptionFollowing { lines: window } => {
                    name_after_caption(&lines, window, tax_id.as_deref())
                }
                LegalNameStrategy::BareHeading { lines: window } => {
                    name_after_heading(&lines, window, tax_id.as_deref())
                }
            };
            trace!("Legal name strategy {:?}: {:?}", strategy, outcome);
            outcome
        });

        DeclarantIdentity { tax_id, legal_name }
    }
}

impl Default for DeclarantExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Identify the declarant in `text` with the standard strategies.
pub fn extract_declarant(text: &str) -> DeclarantIdentity {
    DeclarantExtractor::new().extract(text)
}

fn run_chain<S>(strategies: &[S], mut apply: impl FnMut(&S) -> Outcome) -> Option<String> {
    for strategy in strategies {
        match apply(strategy) {
            Outcome::NotApplicable => continue,
            Outcome::Exhausted => return None,
            Outcome::Found(value) => return Some(value),
        }
    }
    None
}

/// First token shaped like a Spanish tax ID: 8-9 uppercase alphanumerics
/// with at least one digit.
fn find_tax_id(line: &str) -> Option<String> {
    DECLARANT_TAX_ID
        .find_iter(line)
        .map(|m| m.as_str())
        .find(|token| token.chars().any(|c| c.is_ascii_digit()))
        .map(str::to_string)
}

fn tax_id_from_caption(lines: &[&str]) -> Outcome {
    let mut anchored = false;

    for (i, line) in lines.iter().enumerate() {
        if !DECLARANT_TAX_ID_CAPTION.is_match(line) {
            continue;
        }
        anchored = true;

        let found = find_tax_id(line).or_else(|| lines.get(i + 1).and_then(|next| find_tax_id(next)));
        if let Some(tax_id) = found {
            return Outcome::Found(tax_id);
        }
    }

    if anchored { Outcome::Exhausted } else { Outcome::NotApplicable }
}

fn tax_id_near_declarant(lines: &[&str], window: usize) -> Outcome {
    let mut anchored = false;

    for (i, line) in lines.iter().enumerate() {
        if !line.to_lowercase().contains("declarante") {
            continue;
        }
        anchored = true;

        let found = lines
            .iter()
            .skip(i + 1)
            .take(window)
            .find_map(|candidate| find_tax_id(candidate));
        if let Some(tax_id) = found {
            return Outcome::Found(tax_id);
        }
    }

    if anchored { Outcome::Exhausted } else { Outcome::NotApplicable }
}

fn mentions_tax_id(line: &str, tax_id: Option<&str>) -> bool {
    tax_id.is_some_and(|id| line.contains(id))
}

fn is_placeholder(line: &str) -> bool {
    line.eq_ignore_ascii_case("x")
}

fn name_after_caption(lines: &[&str], window: usize, tax_id: Option<&str>) -> Outcome {
    let Some(anchor) = lines.iter().position(|line| LEGAL_NAME_CAPTION.is_match(line)) else {
        return Outcome::NotApplicable;
    };

    lines
        .iter()
        .skip(anchor + 1)
        .take(window)
        .map(|line| line.trim())
        .find(|line| {
            line.chars().count() >= 3
                && !NAME_STOP_WORD.is_match(line)
                && !mentions_tax_id(line, tax_id)
                && !is_placeholder(line)
        })
        .map_or(Outcome::Exhausted, |name| Outcome::Found(name.to_string()))
}

fn name_after_heading(lines: &[&str], window: usize, tax_id: Option<&str>) -> Outcome {
    let Some(anchor) = lines
        .iter()
        .position(|line| line.trim().eq_ignore_ascii_case("declarante"))
    else {
        return Outcome::NotApplicable;
    };

    lines
        .iter()
        .skip(anchor + 1)
        .take(window)
        .map(|line| line.trim())
        .find(|line| {
            UPPERCASE_LETTER.is_match(line)
                && !NAME_STOP_WORD.is_match(line)
                && !CAPTION_FRAGMENT.is_match(line)
                && !mentions_tax_id(line, tax_id)
                && !is_placeholder(line)
        })
        .map_or(Outcome::Exhausted, |name| Outcome::Found(name.to_string()))
}
