//! Price format auditing over raw tile texts.

use crate::price::{self, PriceText};
use serde::Serialize;

/// Outcome of scanning every raw price text on a page.
///
/// Missing prices (no digits) are acceptable and only counted; malformed
/// ones (digits that still refuse to parse) keep their raw text as
/// evidence.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PriceAudit {
    /// Parsed values, in tile order.
    pub values: Vec<f64>,
    /// Tiles with no price rendered at all.
    pub missing: usize,
    /// Raw texts that contained digits but failed to parse.
    pub malformed: Vec<String>,
}

impl PriceAudit {
    /// Classifies every raw price text.
    pub fn scan<S: AsRef<str>>(raw_prices: &[S]) -> Self {
        let mut audit = Self::default();

        for raw in raw_prices {
            match price::classify(raw.as_ref()) {
                PriceText::Value(value) => audit.values.push(value),
                PriceText::Missing => audit.missing += 1,
                PriceText::Malformed => audit.malformed.push(raw.as_ref().to_string()),
            }
        }

        audit
    }

    /// Number of price texts scanned.
    pub fn total(&self) -> usize {
        self.values.len() + self.missing + self.malformed.len()
    }

    /// Share of scanned texts that parsed to a value. Missing prices
    /// count against the ratio; an empty scan scores 0.
    pub fn valid_ratio(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.values.len() as f64 / total as f64
    }

    /// Average of the parsed values, rounded to 2 decimals.
    pub fn average(&self) -> Option<f64> {
        price::average(&self.values)
    }

    /// Lowest and highest parsed value.
    pub fn span(&self) -> Option<(f64, f64)> {
        price::span(&self.values)
    }
}

/// Share of non-empty raw price texts carrying the given currency symbol.
pub fn currency_ratio<S: AsRef<str>>(raw_prices: &[S], symbol: &str) -> f64 {
    let shown: Vec<&str> =
        raw_prices.iter().map(AsRef::as_ref).filter(|raw| !raw.trim().is_empty()).collect();
    if shown.is_empty() {
        return 0.0;
    }

    let with_symbol = shown.iter().filter(|raw| raw.contains(symbol)).count();
    with_symbol as f64 / shown.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_buckets() {
        let raws = vec!["$12.34", "", "Ships soon", "$10 - $20", "$5.00"];
        let audit = PriceAudit::scan(&raws);

        assert_eq!(audit.values, vec![12.34, 5.0]);
        assert_eq!(audit.missing, 2);
        assert_eq!(audit.malformed, vec!["$10 - $20".to_string()]);
        assert_eq!(audit.total(), 5);
    }

    #[test]
    fn test_valid_ratio() {
        let audit = PriceAudit::scan(&["$1.00", "$2.00", "$3.00", "junk-4"]);
        assert_eq!(audit.valid_ratio(), 0.75);

        let empty = PriceAudit::scan::<&str>(&[]);
        assert_eq!(empty.valid_ratio(), 0.0);
    }

    #[test]
    fn test_audit_aggregates() {
        let audit = PriceAudit::scan(&["$10.00", "$20.00", "$30.00"]);
        assert_eq!(audit.average(), Some(20.0));
        assert_eq!(audit.span(), Some((10.0, 30.0)));

        let none = PriceAudit::scan(&["no price"]);
        assert_eq!(none.average(), None);
        assert_eq!(none.span(), None);
    }

    #[test]
    fn test_currency_ratio_counts_only_rendered_prices() {
        // Empty strings are missing prices, not currency mismatches.
        let raws = vec!["$9.99", "", "$19.99", "9,99 €", ""];
        assert_eq!(currency_ratio(&raws, "$"), 2.0 / 3.0);
        assert_eq!(currency_ratio(&raws, "€"), 1.0 / 3.0);
    }

    #[test]
    fn test_currency_ratio_empty() {
        assert_eq!(currency_ratio::<&str>(&[], "$"), 0.0);
        assert_eq!(currency_ratio(&["", ""], "$"), 0.0);
    }
}
