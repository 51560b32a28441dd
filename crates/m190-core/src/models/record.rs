//! Recipient record models for Modelo 190 declarations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One recipient ("perceptor") entry of one page of a declaration.
///
/// Amounts default to zero when the field is not found on the page. Fields
/// that were not found are also listed in [`RecipientRecord::absent_amounts`]
/// so a consumer can tell "zero euros" from "not printed".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipientRecord {
    /// Display name of the source document (usually the file name).
    pub source_document: String,

    /// Page the recipient block was found on (1-indexed).
    pub page_number: u32,

    /// Tax identifier of the filer, if it could be identified.
    pub filer_tax_id: Option<String>,

    /// Legal name of the filer, if it could be identified.
    pub filer_name: Option<String>,

    /// Tax identifier (NIF) of the recipient.
    pub recipient_tax_id: String,

    /// Name of the recipient.
    pub recipient_name: String,

    /// Single-letter income category ("Clave"), empty when absent.
    pub category_code: String,

    /// Two-digit income subcategory ("Subclave"), empty when absent.
    pub subcategory_code: String,

    /// Monetary payments, ordinary income.
    pub monetary_noil: Decimal,

    /// In-kind payments, ordinary income.
    pub inkind_noil: Decimal,

    /// Monetary payments, irregular income.
    pub monetary_il: Decimal,

    /// In-kind payments, irregular income.
    pub inkind_il: Decimal,

    /// Amount fields that were not found in the recipient block.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub absent_amounts: Vec<AmountField>,
}

impl RecipientRecord {
    /// Get the value of one of the four amount fields.
    pub fn amount(&self, field: AmountField) -> Decimal {
        match field {
            AmountField::MonetaryNoIl => self.monetary_noil,
            AmountField::InKindNoIl => self.inkind_noil,
            AmountField::MonetaryIl => self.monetary_il,
            AmountField::InKindIl => self.inkind_il,
        }
    }

    /// Get an amount, or `None` when the field was not present in the block.
    pub fn amount_if_present(&self, field: AmountField) -> Option<Decimal> {
        if self.absent_amounts.contains(&field) {
            None
        } else {
            Some(self.amount(field))
        }
    }

    /// Sum of the four amount fields.
    pub fn total(&self) -> Decimal {
        AmountField::ALL.iter().map(|f| self.amount(*f)).sum()
    }
}

/// The four amount columns of a recipient block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountField {
    /// Monetary payments (dinerarias), ordinary income.
    MonetaryNoIl,
    /// In-kind payments (especie), ordinary income.
    InKindNoIl,
    /// Monetary payments (dinerarias), irregular income.
    MonetaryIl,
    /// In-kind payments (especie), irregular income.
    InKindIl,
}

impl AmountField {
    /// All fields in column order.
    pub const ALL: [AmountField; 4] = [
        AmountField::MonetaryNoIl,
        AmountField::InKindNoIl,
        AmountField::MonetaryIl,
        AmountField::InKindIl,
    ];

    /// Column header used in exported tables.
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::MonetaryNoIl => "Dinerarias NO IL",
            Self::InKindNoIl => "Especie NO IL",
            Self::MonetaryIl => "Dinerarias IL",
            Self::InKindIl => "Especie IL",
        }
    }

    /// Whether the field is reported under the monetary caption.
    pub fn is_monetary(&self) -> bool {
        matches!(self, Self::MonetaryNoIl | Self::MonetaryIl)
    }

    /// 1-based occurrence of the caption inside a recipient block.
    ///
    /// Ordinary income is printed before irregular income, so the first
    /// occurrence of a caption is the ordinary one.
    pub fn instance(&self) -> usize {
        match self {
            Self::MonetaryNoIl | Self::InKindNoIl => 1,
            Self::MonetaryIl | Self::InKindIl => 2,
        }
    }
}

/// Identity of the filer (declarante) of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarantIdentity {
    /// Tax identifier of the filer.
    pub tax_id: Option<String>,
    /// Legal name (razón social) of the filer.
    pub legal_name: Option<String>,
}

impl DeclarantIdentity {
    /// Both pieces were found.
    pub fn is_complete(&self) -> bool {
        self.tax_id.is_some() && self.legal_name.is_some()
    }

    /// Neither piece was found.
    pub fn is_empty(&self) -> bool {
        self.tax_id.is_none() && self.legal_name.is_none()
    }

    /// Fill missing pieces from `fallback`; pieces already present win.
    pub fn merge(self, fallback: DeclarantIdentity) -> Self {
        Self {
            tax_id: self.tax_id.or(fallback.tax_id),
            legal_name: self.legal_name.or(fallback.legal_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record() -> RecipientRecord {
        RecipientRecord {
            source_document: "190.pdf".to_string(),
            page_number: 1,
            filer_tax_id: None,
            filer_name: None,
            recipient_tax_id: "12345678A".to_string(),
            recipient_name: "JOHN DOE".to_string(),
            category_code: "A".to_string(),
            subcategory_code: String::new(),
            monetary_noil: Decimal::from_str("1000.00").unwrap(),
            inkind_noil: Decimal::ZERO,
            monetary_il: Decimal::from_str("50.00").unwrap(),
            inkind_il: Decimal::ZERO,
            absent_amounts: vec![AmountField::InKindIl],
        }
    }

    #[test]
    fn test_amount_if_present() {
        let r = record();
        assert_eq!(r.amount_if_present(AmountField::InKindIl), None);
        assert_eq!(r.amount_if_present(AmountField::InKindNoIl), Some(Decimal::ZERO));
        assert_eq!(r.total(), Decimal::from_str("1050.00").unwrap());
    }

    #[test]
    fn test_declarant_merge_keeps_primary() {
        let primary = DeclarantIdentity {
            tax_id: Some("B12345678".to_string()),
            legal_name: None,
        };
        let fallback = DeclarantIdentity {
            tax_id: Some("A87654321".to_string()),
            legal_name: Some("ACME SL".to_string()),
        };

        let merged = primary.merge(fallback);
        assert_eq!(merged.tax_id.as_deref(), Some("B12345678"));
        assert_eq!(merged.legal_name.as_deref(), Some("ACME SL"));
        assert!(merged.is_complete());
    }

    #[test]
    fn test_record_serializes_without_empty_absent_list() {
        let mut r = record();
        r.absent_amounts.clear();
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("absent_amounts").is_none());
        assert_eq!(json["recipient_tax_id"], "12345678A");
    }
}
