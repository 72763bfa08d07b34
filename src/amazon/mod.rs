//! Storefront-specific layer: locales, selectors, sessions, page health.

pub mod locales;
pub mod monitor;
pub mod selectors;
pub mod session;

pub use locales::Locale;
pub use monitor::Monitor;
pub use session::{Device, Session};
