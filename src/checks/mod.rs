//! Pure verification logic over extracted page data.
//!
//! Everything here is browser-free: the flow runner extracts, these
//! functions judge. Thresholds live with the checks that use them.

pub mod layout;
pub mod pricing;
pub mod relevance;

pub use layout::{column_count, columns_acceptable, expected_columns};
pub use pricing::{currency_ratio, PriceAudit};
pub use relevance::{overlap_count, relevance_ratio};

/// Minimum share of tile prices that must parse cleanly.
pub const MIN_PRICE_VALID_RATIO: f64 = 0.70;

/// Minimum share of prices that must carry the locale's currency symbol.
pub const MIN_CURRENCY_RATIO: f64 = 0.80;

/// Minimum share of top titles that must match a keyword variant.
pub const MIN_RELEVANCE_RATIO: f64 = 0.80;

/// Minimum title overlap between two runs of the same search.
pub const MIN_SORT_OVERLAP: usize = 1;

/// Upper bound on search-to-stable load time, in seconds.
pub const MAX_LOAD_SECONDS: f64 = 13.0;
