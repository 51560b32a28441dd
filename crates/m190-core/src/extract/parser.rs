//! Document-level extraction: declarant plus one record per recipient block.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ConfigError;
use crate::models::config::ExtractionConfig;
use crate::models::record::{AmountField, DeclarantIdentity, RecipientRecord};

use super::declarant::DeclarantExtractor;
use super::rules::{OrdinalField, RecipientSegmenter, parse_identity};
use super::rules::locator::DEFAULT_LOOKAHEAD_CHARS;

/// Counters and findings of one document extraction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionReport {
    /// Display name of the document.
    pub document_name: String,
    /// Declarant stamped on every record.
    pub declarant: DeclarantIdentity,
    /// Pages received.
    pub pages: usize,
    /// Blocks produced by segmentation.
    pub candidate_blocks: usize,
    /// Blocks without a recipient identity.
    pub dropped_blocks: usize,
    /// Records emitted.
    pub records: usize,
    /// Things a reviewer should look at.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Records of one document together with its report.
#[derive(Debug, Clone)]
pub struct DocumentExtraction {
    pub records: Vec<RecipientRecord>,
    pub report: ExtractionReport,
}

/// Extracts recipient records from the page texts of a Modelo 190 document.
#[derive(Debug, Clone)]
pub struct Modelo190Parser {
    segmenter: RecipientSegmenter,
    declarant: DeclarantExtractor,
    monetary_label: String,
    inkind_label: String,
    lookahead_chars: usize,
    summary_page_index: usize,
}

impl Modelo190Parser {
    /// Create a parser for the standard AEAT layout.
    pub fn new() -> Self {
        let defaults = ExtractionConfig::default();
        Self {
            segmenter: RecipientSegmenter::new(),
            declarant: DeclarantExtractor::new(),
            monetary_label: defaults.monetary_label,
            inkind_label: defaults.inkind_label,
            lookahead_chars: DEFAULT_LOOKAHEAD_CHARS,
            summary_page_index: defaults.summary_page_index,
        }
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            segmenter: RecipientSegmenter::with_marker(&config.recipient_marker)?,
            declarant: DeclarantExtractor::from_config(config),
            monetary_label: config.monetary_label.clone(),
            inkind_label: config.inkind_label.clone(),
            lookahead_chars: config.lookahead_chars,
            summary_page_index: config.summary_page_index,
        })
    }

    /// Set the lookahead window used after each caption.
    pub fn with_lookahead(mut self, chars: usize) -> Self {
        self.lookahead_chars = chars;
        self
    }

    /// Set the zero-based index of the declarant summary page.
    pub fn with_summary_page(mut self, index: usize) -> Self {
        self.summary_page_index = index;
        self
    }

    /// Replace the declarant extractor.
    pub fn with_declarant_extractor(mut self, extractor: DeclarantExtractor) -> Self {
        self.declarant = extractor;
        self
    }

    /// Caption and occurrence that resolve `field`.
    pub fn ordinal_field(&self, field: AmountField) -> OrdinalField<'_> {
        let label = if field.is_monetary() {
            self.monetary_label.as_str()
        } else {
            self.inkind_label.as_str()
        };
        OrdinalField::new(label, field.instance()).with_lookahead(self.lookahead_chars)
    }

    /// Identify the declarant from the summary page, then fill whatever is
    /// still missing from the whole document.
    pub fn identify_declarant<S: AsRef<str>>(&self, pages: &[S]) -> DeclarantIdentity {
        let primary = pages
            .get(self.summary_page_index)
            .map(|page| self.declarant.extract(page.as_ref()))
            .unwrap_or_default();

        if primary.is_complete() {
            return primary;
        }

        debug!(
            "Declarant incomplete on summary page {} ({:?}), scanning whole document",
            self.summary_page_index + 1,
            primary
        );
        let full_text = pages.iter().map(|p| p.as_ref()).collect::<Vec<&str>>().join("\n");
        primary.merge(self.declarant.extract(&full_text))
    }

    /// Extract every recipient record of the document.
    pub fn extract<S: AsRef<str>>(&self, pages: &[S], document_name: &str) -> DocumentExtraction {
        let mut records = Vec::new();
        let report = self.extract_into(pages, document_name, &mut records);
        DocumentExtraction { records, report }
    }

    /// Extract every recipient record of the document, appending to
    /// `records`. Records already in the collection are left untouched.
    pub fn extract_into<S: AsRef<str>>(
        &self,
        pages: &[S],
        document_name: &str,
        records: &mut Vec<RecipientRecord>,
    ) -> ExtractionReport {
        let start = Instant::now();
        let before = records.len();

        info!("Extracting {} from {} pages", document_name, pages.len());

        let declarant = self.identify_declarant(pages);
        let mut report = ExtractionReport {
            document_name: document_name.to_string(),
            pages: pages.len(),
            ..Default::default()
        };

        if declarant.is_empty() {
            warn!("Could not identify the declarant of {}", document_name);
            report.warnings.push("Could not identify the declarant".to_string());
        } else if !declarant.is_complete() {
            report.warnings.push(format!(
                "Declarant only partially identified (tax ID: {}, name: {})",
                declarant.tax_id.as_deref().unwrap_or("-"),
                declarant.legal_name.as_deref().unwrap_or("-"),
            ));
        }

        for (page_idx, page) in pages.iter().enumerate() {
            let page_number = (page_idx + 1) as u32;
            let blocks = self.segmenter.segment(page.as_ref());
            report.candidate_blocks += blocks.len();

            for block in &blocks {
                let Some(identity) = parse_identity(block.text) else {
                    debug!(
                        "Page {} block {}: no recipient identity, skipping",
                        page_number, block.index
                    );
                    report.dropped_blocks += 1;
                    continue;
                };

                let mut amounts = [Decimal::ZERO; 4];
                let mut absent_amounts = Vec::new();
                for (slot, field) in amounts.iter_mut().zip(AmountField::ALL) {
                    match self.ordinal_field(field).locate(block.text) {
                        Some(found) => *slot = found.value,
                        None => absent_amounts.push(field),
                    }
                }
                let [monetary_noil, inkind_noil, monetary_il, inkind_il] = amounts;

                records.push(RecipientRecord {
                    source_document: document_name.to_string(),
                    page_number,
                    filer_tax_id: declarant.tax_id.clone(),
                    filer_name: declarant.legal_name.clone(),
                    recipient_tax_id: identity.tax_id,
                    recipient_name: identity.name,
                    category_code: identity.category_code,
                    subcategory_code: identity.subcategory_code,
                    monetary_noil,
                    inkind_noil,
                    monetary_il,
                    inkind_il,
                    absent_amounts,
                });
            }

            debug!("Page {}: {} candidate blocks", page_number, blocks.len());
        }

        report.records = records.len() - before;
        if report.records == 0 {
            report.warnings.push("No recipient records found".to_string());
        }
        report.declarant = declarant;
        report.processing_time_ms = start.elapsed().as_millis() as u64;

        debug!(
            "Extracted {} records from {} ({} blocks dropped)",
            report.records, document_name, report.dropped_blocks
        );

        report
    }
}

impl Default for Modelo190Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the recipient records of one document with the standard layout.
pub fn extract_document<S: AsRef<str>>(pages: &[S], document_name: &str) -> Vec<RecipientRecord> {
    Modelo190Parser::new().extract(pages, document_name).records
}

/// Like [`extract_document`], appending to a caller-owned collection.
pub fn extract_document_into<S: AsRef<str>>(
    pages: &[S],
    document_name: &str,
    records: &mut Vec<RecipientRecord>,
) -> ExtractionReport {
    Modelo190Parser::new().extract_into(pages, document_name, records)
}
