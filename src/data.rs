//! JSON test data: search terms and keyword variants.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Named search inputs for flow runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestData {
    /// Well-behaved search terms by scenario name.
    pub valid_products: BTreeMap<String, String>,

    /// The deliberately empty input.
    #[serde(default)]
    pub empty_input: String,

    /// A ≥500 character query for input-length edge cases.
    pub long_query: String,
}

impl TestData {
    /// Loads test data from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading test data from: {}", path.display());

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Test data file not found: {}", path.display()))?;

        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse test data: {}", path.display()))
    }

    /// Loads the bundled test data shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_file(data_dir().join("data.json"))
    }

    /// A named valid product term.
    pub fn valid_product(&self, name: &str) -> Result<&str> {
        self.valid_products
            .get(name)
            .map(String::as_str)
            .with_context(|| format!("No valid product named '{}' in test data", name))
    }
}

/// Keyword variants accepted as a relevance match, per search term.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordVariants(BTreeMap<String, Vec<String>>);

impl KeywordVariants {
    /// Loads variants from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading keyword variants from: {}", path.display());

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Keyword variants file not found: {}", path.display()))?;

        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse keyword variants: {}", path.display()))
    }

    /// Loads the bundled variants shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_file(data_dir().join("keyword_variants.json"))
    }

    /// Variants for a search term; missing keys are an error so typos in
    /// test data fail loudly.
    pub fn for_term(&self, term: &str) -> Result<&[String]> {
        self.0
            .get(&term.to_lowercase())
            .map(Vec::as_slice)
            .with_context(|| format!("No keyword variants for term '{}'", term))
    }

    /// Variants for a term when present, without failing.
    pub fn get(&self, term: &str) -> Option<&[String]> {
        self.0.get(&term.to_lowercase()).map(Vec::as_slice)
    }
}

/// Directory holding the bundled JSON test data.
fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_data")
}
