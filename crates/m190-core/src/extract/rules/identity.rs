//! Recipient identity parsing.

use serde::{Deserialize, Serialize};

use super::patterns::{CATEGORY_CODE, RECIPIENT_IDENTITY, SUBCATEGORY_CODE};

/// Identity printed at the head of a recipient block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientIdentity {
    /// Tax identifier (NIF/NIE) of the recipient.
    pub tax_id: String,
    /// Recipient name, trimmed.
    pub name: String,
    /// Income category ("Clave"), empty when absent.
    pub category_code: String,
    /// Income subcategory ("Subclave"), empty when absent.
    pub subcategory_code: String,
}

/// Parse the recipient identity out of a block.
///
/// The block must contain a tax ID, a name and a two-digit code in that
/// order; otherwise it is not a recipient and `None` is returned. Tokens
/// made only of letters (uppercase captions) are skipped as tax IDs.
pub fn parse_identity(block: &str) -> Option<RecipientIdentity> {
    let mut from = 0;

    while let Some(caps) = RECIPIENT_IDENTITY.captures_at(block, from) {
        let tax_id = caps.get(1)?;

        if tax_id.as_str().chars().any(|c| c.is_ascii_digit()) {
            return Some(RecipientIdentity {
                tax_id: tax_id.as_str().to_string(),
                name: caps[2].trim().to_string(),
                category_code: category_code(block),
                subcategory_code: subcategory_code(block),
            });
        }

        from = tax_id.end();
    }

    None
}

/// Single-letter category after "Clave:", empty when absent.
pub fn category_code(block: &str) -> String {
    CATEGORY_CODE
        .captures(block)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

/// Two-digit subcategory after "Subclave:", empty when absent.
pub fn subcategory_code(block: &str) -> String {
    SUBCATEGORY_CODE
        .captures(block)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identity() {
        let id = parse_identity("12345678A JOHN DOE 02").unwrap();
        assert_eq!(id.tax_id, "12345678A");
        assert_eq!(id.name, "JOHN DOE");
        assert_eq!(id.category_code, "");
        assert_eq!(id.subcategory_code, "");
    }

    #[test]
    fn test_parse_identity_with_codes() {
        let block = "\n X1234567L  GARCÍA LÓPEZ, MARÍA   28 Clave: A Subclave: 01\nPercepción íntegra 1.000,00";
        let id = parse_identity(block).unwrap();
        assert_eq!(id.tax_id, "X1234567L");
        assert_eq!(id.name, "GARCÍA LÓPEZ, MARÍA");
        assert_eq!(id.category_code, "A");
        assert_eq!(id.subcategory_code, "01");
    }

    #[test]
    fn test_parse_identity_rejects_non_recipient() {
        assert!(parse_identity("").is_none());
        assert!(parse_identity("Resumen de la declaración").is_none());
        assert!(parse_identity("12345678A JOHN DOE").is_none());
        assert!(parse_identity("123 JOHN DOE 02").is_none());
    }

    #[test]
    fn test_parse_identity_skips_caption_tokens() {
        let id = parse_identity("PERCEPTOR 12345678Z ANA RUIZ 08").unwrap();
        assert_eq!(id.tax_id, "12345678Z");
        assert_eq!(id.name, "ANA RUIZ");
    }

    #[test]
    fn test_codes_are_independent() {
        assert_eq!(category_code("Subclave: 01"), "");
        assert_eq!(subcategory_code("Subclave: 01"), "01");
        assert_eq!(category_code("Clave: L Subclave: x"), "L");
        assert_eq!(subcategory_code("Clave: L Subclave: x"), "");
    }
}
