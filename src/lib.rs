//! amz-e2e - End-to-end search flow checks for Amazon storefronts
//!
//! Drives a live storefront over WebDriver and verifies search behavior:
//! result relevance, price formatting and currency, page health, layout,
//! and load performance. The wait layer and the currency parser carry
//! the interesting logic; everything else is page plumbing.

pub mod amazon;
pub mod checks;
pub mod commands;
pub mod config;
pub mod data;
pub mod format;
pub mod pages;
pub mod price;
pub mod wait;

pub use amazon::locales::Locale;
pub use amazon::session::{Device, Session};
pub use config::Config;
pub use wait::{GridProbe, Stability, WaitError};
