//! Storefront locales: domains, language tags, and currency formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storefront locales the suite can run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Us,
    De,
    Uk,
}

impl Locale {
    /// Returns the storefront domain for this locale.
    pub fn domain(&self) -> &'static str {
        match self {
            Locale::Us => "amazon.com",
            Locale::De => "amazon.de",
            Locale::Uk => "amazon.co.uk",
        }
    }

    /// Returns the production base URL.
    pub fn production_url(&self) -> String {
        format!("https://www.{}", self.domain())
    }

    /// Returns the staging base URL.
    pub fn staging_url(&self) -> String {
        match self {
            Locale::Us => "https://amazon.staging.com".to_string(),
            Locale::De => "https://amazon.staging.de".to_string(),
            Locale::Uk => "https://amazon.staging.uk".to_string(),
        }
    }

    /// Returns the storefront language tag (the `lc-main` cookie value).
    pub fn language(&self) -> &'static str {
        match self {
            Locale::Us => "en_US",
            Locale::De => "de_DE",
            Locale::Uk => "en_GB",
        }
    }

    /// Returns the currency code for this locale (the `i18n-prefs` cookie value).
    pub fn currency(&self) -> &'static str {
        match self {
            Locale::Us => "USD",
            Locale::De => "EUR",
            Locale::Uk => "GBP",
        }
    }

    /// Returns the currency symbol shown on rendered prices.
    pub fn currency_symbol(&self) -> &'static str {
        match self {
            Locale::Us => "$",
            Locale::De => "€",
            Locale::Uk => "£",
        }
    }

    /// Returns a deliverable ZIP/postcode for the locale.
    pub fn zip(&self) -> &'static str {
        match self {
            Locale::Us => "10001",
            Locale::De => "10115",
            Locale::Uk => "SW1A",
        }
    }

    /// Returns the Accept-Language header value for this locale.
    pub fn accept_language(&self) -> &'static str {
        match self {
            Locale::Us => "en-US,en;q=0.9",
            Locale::De => "de-DE,de;q=0.9,en;q=0.8",
            Locale::Uk => "en-GB,en;q=0.9",
        }
    }

    /// Returns whether rendered prices use a comma decimal separator.
    pub fn uses_comma_decimal(&self) -> bool {
        matches!(self, Locale::De)
    }

    /// Returns all supported locales.
    pub fn all() -> &'static [Locale] {
        &[Locale::Us, Locale::De, Locale::Uk]
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Locale::Us => "us",
            Locale::De => "de",
            Locale::Uk => "uk",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Locale {
    type Err = LocaleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "us" | "usa" | "united states" => Ok(Locale::Us),
            "de" | "germany" => Ok(Locale::De),
            "uk" | "gb" | "united kingdom" => Ok(Locale::Uk),
            _ => Err(LocaleParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocaleParseError(String);

impl fmt::Display for LocaleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown locale '{}'. Valid locales: us, de, uk", self.0)
    }
}

impl std::error::Error for LocaleParseError {}
