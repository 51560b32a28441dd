//! Amount normalization for Spanish-formatted currency.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Convert a Spanish-formatted amount ("1.234,56") into a decimal.
///
/// Everything except ASCII digits, `,` and `.` is dropped first. Periods are
/// thousands separators and the comma is the decimal separator. Empty or
/// unparseable input yields zero; this function never fails.
///
/// Values are held as [`Decimal`], so amounts beyond `Decimal::MAX`
/// (about 7.9e28) do not fit and also yield zero.
pub fn normalize_amount(text: &str) -> Decimal {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return Decimal::ZERO;
    }

    let normalized = cleaned.replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}

/// Format an amount in Spanish style (1.234,56).
pub fn format_spanish_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();
    if amount.is_sign_negative() && !amount.is_zero() {
        formatted.push('-');
    }

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{},{}", formatted, decimal_part)
}
