//! Common regex patterns for Modelo 190 extraction.
//!
//! All patterns run on the `regex` crate's finite automata, so a malformed
//! page cannot trigger catastrophic backtracking.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Spanish currency amount with exactly two decimals: 1.234.567,89
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"\d{1,3}(?:\.\d{3})*,\d{2}"
    ).unwrap();

    // Recipient ordinal marker printed once per perceptor: "Percepción 12"
    pub static ref RECIPIENT_MARKER: Regex = Regex::new(
        r"Percepción\s+(\d+)"
    ).unwrap();

    // Head of a recipient block: NIF, name, two-digit province code
    pub static ref RECIPIENT_IDENTITY: Regex = Regex::new(
        r"\b([A-Z0-9][A-Z0-9]{7,8})\s+(.*?)\s+(\d{2})\b"
    ).unwrap();

    pub static ref CATEGORY_CODE: Regex = Regex::new(
        r"\bClave:\s*([A-Z])\b"
    ).unwrap();

    pub static ref SUBCATEGORY_CODE: Regex = Regex::new(
        r"\bSubclave:\s*(\d{2})\b"
    ).unwrap();

    // Fiscal identifier captions on the declarant summary
    pub static ref DECLARANT_TAX_ID_CAPTION: Regex = Regex::new(
        r"(?i)(?:\bNIF\s+(?:del\s+)?declarante|\bN\.\s?I\.\s?F\.\s+(?:del\s+)?declarante|n[uú]mero\s+de\s+identificaci[oó]n\s+fiscal)"
    ).unwrap();

    pub static ref DECLARANT_TAX_ID: Regex = Regex::new(
        r"\b[A-Z0-9][A-Z0-9]{7,8}\b"
    ).unwrap();

    pub static ref LEGAL_NAME_CAPTION: Regex = Regex::new(
        r"(?i)raz[oó]n\s+social"
    ).unwrap();

    pub static ref UPPERCASE_LETTER: Regex = Regex::new(
        r"[A-ZÁÉÍÓÚÜÑÇ]"
    ).unwrap();

    // Captions and procedural words that are never a legal name. Whole words
    // only, so "UNIFORMES" or "TOTALMEDIA" still pass.
    pub static ref NAME_STOP_WORD: Regex = Regex::new(
        r"(?i)\b(?:n\.i\.f|nif|tel[eé]fono|persona\s+de\s+contacto|ejercicio|modelo|declaraci[oó]n|complementaria|sustitutiva|justificante|n[uú]mero|p[aá]gina|resumen|domicilio|apellidos|raz[oó]n\s+social|identificaci[oó]n|percepciones|retenciones|importe|total)\b"
    ).unwrap();

    // Pieces of the declarant captions themselves
    pub static ref CAPTION_FRAGMENT: Regex = Regex::new(
        r"(?i)\b(?:declarante|denominaci[oó]n|nombre)\b|:"
    ).unwrap();
}

/// Build a recipient marker pattern for a custom caption word.
pub fn recipient_marker(word: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"{}\s+(\d+)", regex::escape(word)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_pattern() {
        assert_eq!(AMOUNT_PATTERN.find("Total 1.234.567,89 EUR").unwrap().as_str(), "1.234.567,89");
        assert_eq!(AMOUNT_PATTERN.find("x 50,00").unwrap().as_str(), "50,00");
        assert!(AMOUNT_PATTERN.find("1.234").is_none());
        assert!(AMOUNT_PATTERN.find("12,5").is_none());
    }

    #[test]
    fn test_recipient_marker_ignores_integra_caption() {
        assert!(RECIPIENT_MARKER.is_match("Percepción 3"));
        assert!(!RECIPIENT_MARKER.is_match("Percepción íntegra 1.000,00"));
    }

    #[test]
    fn test_custom_marker_is_escaped() {
        let re = recipient_marker("Perceptor (n.º)").unwrap();
        assert!(re.is_match("Perceptor (n.º) 4"));
        assert!(!re.is_match("Perceptor xn.º) 4"));
    }

    #[test]
    fn test_tax_id_caption_variants() {
        assert!(DECLARANT_TAX_ID_CAPTION.is_match("NIF del declarante"));
        assert!(DECLARANT_TAX_ID_CAPTION.is_match("N.I.F. declarante: B12345678"));
        assert!(DECLARANT_TAX_ID_CAPTION.is_match("Número de identificación fiscal"));
        assert!(!DECLARANT_TAX_ID_CAPTION.is_match("NIF del perceptor"));
    }

    #[test]
    fn test_stop_words_match_whole_words_only() {
        assert!(NAME_STOP_WORD.is_match("NIF: B12345678"));
        assert!(NAME_STOP_WORD.is_match("N.I.F. del declarante"));
        assert!(NAME_STOP_WORD.is_match("TELÉFONO DE CONTACTO"));
        assert!(NAME_STOP_WORD.is_match("Importe total"));
        assert!(!NAME_STOP_WORD.is_match("UNIFORMES DEL NORTE SL"));
        assert!(!NAME_STOP_WORD.is_match("TOTALMEDIA SA"));
        assert!(!NAME_STOP_WORD.is_match("IMPORTEX SA"));
        assert!(!NAME_STOP_WORD.is_match("MODELOS 3D SL"));
    }

    #[test]
    fn test_caption_fragments() {
        assert!(CAPTION_FRAGMENT.is_match("Denominación"));
        assert!(CAPTION_FRAGMENT.is_match("ACME: SL"));
        assert!(!CAPTION_FRAGMENT.is_match("NOMBRES Y MARCAS SL"));
    }
}
