pub mod client;
pub mod commute;
pub mod detail;
pub mod extract;
pub mod pages;
pub mod types;

pub use client::create_client;
pub use types::Listing;

use anyhow::Result;
use scraper::Selector;

/// Parse a CSS selector into an anyhow-friendly error on failure.
/// Selector errors carry a borrowed lifetime, so they cannot cross `?` as-is.
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("Invalid selector {:?}: {}", css, e))
}
