//! Price string parsing and aggregation.
//!
//! Storefront price text is scraped, not structured: it arrives with
//! currency symbols, locale-specific grouping, ranges ("$10 - $20"),
//! and lead-in prices ("from $5" / "ab 9,99 €"). Everything that is not
//! a single definite price normalizes to `None`.

/// Outcome of classifying one raw price string.
///
/// A string with no digits at all never was a price (`Missing`); a string
/// with digits that still fails to parse points at a rendering defect
/// (`Malformed`). Callers must not conflate the two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceText {
    /// No digits in the text; expected and ignorable.
    Missing,
    /// Digits present but no single price could be extracted.
    Malformed,
    /// A single definite price.
    Value(f64),
}

impl PriceText {
    /// Returns the parsed value, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            PriceText::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// Parses a currency string (e.g. `"$1,234.56"` or `"1.234,56 €"`) into a
/// numeric value.
///
/// Never panics; every invalid or ambiguous input maps to `None`:
/// ranges, lead-in prices, empty text, and text that leaves no digits
/// behind once symbols are stripped.
///
/// Separator disambiguation is last-separator-wins: whichever of `.` and
/// `,` occurs later in the string is taken as the decimal separator. A
/// grouping-only value like `"1.234"` therefore parses as `1.234`, not
/// `1234` - callers that care must bring locale context of their own.
pub fn parse_currency(text: &str) -> Option<f64> {
    let raw: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if raw.is_empty() {
        return None;
    }

    // Ranges are not single prices; do not average or pick an endpoint.
    let lower = raw.to_lowercase();
    if raw.contains(['-', '\u{2013}', '\u{2014}']) || lower.contains("to") {
        return None;
    }

    // Lead-in prices ("from $5", German "ab 9,99 €").
    if lower.starts_with("from") || lower.starts_with("ab") {
        return None;
    }

    // Drop currency symbols and any other residue.
    let digits: String =
        raw.chars().filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',').collect();
    if digits.is_empty() {
        return None;
    }

    let last_dot = digits.rfind('.');
    let last_comma = digits.rfind(',');

    // The later separator is the decimal separator.
    let normalized = if last_comma > last_dot {
        // EU style: 1.234,56
        digits.replace('.', "").replace(',', ".")
    } else {
        // US style: 1,234.56 (or no comma at all)
        digits.replace(',', "")
    };

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

/// Classifies a raw price string as missing, malformed, or a value.
pub fn classify(text: &str) -> PriceText {
    if !text.chars().any(|c| c.is_ascii_digit()) {
        return PriceText::Missing;
    }
    match parse_currency(text) {
        Some(value) => PriceText::Value(value),
        None => PriceText::Malformed,
    }
}

/// Arithmetic mean of a set of prices, rounded to 2 decimal places.
///
/// Returns `None` for the empty set. Performs no filtering of its own;
/// unparseable entries must be dropped before aggregation.
pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}

/// Lowest and highest price in a set, ignoring non-finite entries.
pub fn span(values: &[f64]) -> Option<(f64, f64)> {
    let mut finite = values.iter().copied().filter(|v| v.is_finite());
    let first = finite.next()?;
    Some(finite.fold((first, first), |(lo, hi), v| (v.min(lo), v.max(hi))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_us_formats() {
        assert_eq!(parse_currency("$12.34"), Some(12.34));
        assert_eq!(parse_currency("$1,234.56"), Some(1234.56));
        assert_eq!(parse_currency("1,234.56"), Some(1234.56));
        assert_eq!(parse_currency("$0.99"), Some(0.99));
        assert_eq!(parse_currency("$10"), Some(10.0));
    }

    #[test]
    fn test_parse_eu_formats() {
        assert_eq!(parse_currency("1.234,56"), Some(1234.56));
        assert_eq!(parse_currency("1.234,56 €"), Some(1234.56));
        assert_eq!(parse_currency("9,99 €"), Some(9.99));
        assert_eq!(parse_currency("€29,99"), Some(29.99));
    }

    #[test]
    fn test_parse_ranges() {
        assert_eq!(parse_currency("$10 - $20"), None);
        assert_eq!(parse_currency("$10-$20"), None);
        assert_eq!(parse_currency("10\u{2013}20"), None);
        assert_eq!(parse_currency("10\u{2014}20"), None);
        assert_eq!(parse_currency("$10 to $20"), None);
        assert_eq!(parse_currency("$10 TO $20"), None);
    }

    #[test]
    fn test_parse_lead_in_prices() {
        assert_eq!(parse_currency("from $5"), None);
        assert_eq!(parse_currency("From $5.99"), None);
        assert_eq!(parse_currency("ab 9,99 €"), None);
        assert_eq!(parse_currency("AB 9,99"), None);
    }

    #[test]
    fn test_parse_empty_and_garbage() {
        assert_eq!(parse_currency(""), None);
        assert_eq!(parse_currency("   "), None);
        assert_eq!(parse_currency("no price here"), None);
        assert_eq!(parse_currency("$"), None);
        assert_eq!(parse_currency("..,,"), None);
    }

    #[test]
    fn test_parse_separator_heuristic_documented() {
        // Last-separator-wins: a lone dot is read as the decimal point
        // even when it is plausibly a thousands group.
        assert_eq!(parse_currency("1.234"), Some(1.234));
        // A lone comma is likewise read as the decimal separator (EU
        // branch), not as a thousands group.
        assert_eq!(parse_currency("1,234"), Some(1.234));
    }

    #[test]
    fn test_parse_is_pure() {
        let input = "$12.34";
        let first = parse_currency(input);
        let second = parse_currency(input);
        assert_eq!(first, second);
        assert_eq!(input, "$12.34");
    }

    #[test]
    fn test_classify_missing() {
        assert_eq!(classify(""), PriceText::Missing);
        assert_eq!(classify("   "), PriceText::Missing);
        assert_eq!(classify("Ships from Amazon"), PriceText::Missing);
        assert_eq!(classify("N/A"), PriceText::Missing);
    }

    #[test]
    fn test_classify_malformed() {
        // Digits present, but range-shaped: a defect signal, not "missing".
        assert_eq!(classify("$10 - $20"), PriceText::Malformed);
        assert_eq!(classify("from $5"), PriceText::Malformed);
        assert_eq!(classify("1..2"), PriceText::Malformed);
    }

    #[test]
    fn test_classify_value() {
        assert_eq!(classify("$12.34"), PriceText::Value(12.34));
        assert_eq!(classify("1.234,56 €"), PriceText::Value(1234.56));
        assert_eq!(classify("$12.34").value(), Some(12.34));
        assert_eq!(classify("no digits").value(), None);
    }

    #[test]
    fn test_classify_never_conflates_missing_and_malformed() {
        assert_ne!(classify("Ships from Amazon"), classify("from $5"));
    }

    #[test]
    fn test_average_basic() {
        assert_eq!(average(&[10.0, 20.0, 30.0]), Some(20.0));
        assert_eq!(average(&[19.99]), Some(19.99));
    }

    #[test]
    fn test_average_rounding() {
        assert_eq!(average(&[9.999, 10.001]), Some(10.0));
        assert_eq!(average(&[0.005]), Some(0.01));
        assert_eq!(average(&[1.0, 2.0]), Some(1.5));
    }

    #[test]
    fn test_average_empty() {
        assert_eq!(average(&[]), None);
    }

    #[test]
    fn test_span() {
        assert_eq!(span(&[10.0, 5.0, 20.0]), Some((5.0, 20.0)));
        assert_eq!(span(&[7.5]), Some((7.5, 7.5)));
        assert_eq!(span(&[]), None);
        assert_eq!(span(&[f64::NAN, 3.0]), Some((3.0, 3.0)));
    }
}
