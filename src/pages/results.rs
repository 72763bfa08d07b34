//! Search results page: grid stabilization, extraction, pagination.

use crate::amazon::selectors::results;
use crate::config::Config;
use crate::pages::base;
use crate::pages::tile::Tile;
use crate::price;
use crate::wait::{self, GridProbe, Stability};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use thirtyfour::prelude::*;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Live probe over the rendered result grid.
pub struct TileGrid {
    driver: WebDriver,
}

impl TileGrid {
    pub fn new(driver: WebDriver) -> Self {
        Self { driver }
    }
}

#[async_trait]
impl GridProbe for TileGrid {
    async fn first_visible(&self) -> Result<bool> {
        base::visible(&self.driver, results::TILE).await
    }

    async fn count(&self) -> Result<usize> {
        let tiles = self.driver.find_all(By::Css(results::TILE)).await.unwrap_or_default();
        Ok(tiles.len())
    }
}

/// The search results page.
pub struct ResultsPage {
    driver: WebDriver,
    quiet: Duration,
    timeout: Duration,
}

impl ResultsPage {
    pub fn new(driver: WebDriver, config: &Config) -> Self {
        Self { driver, quiet: config.quiet(), timeout: config.results_timeout() }
    }

    /// Probe over this page's grid, for the wait layer.
    pub fn grid(&self) -> TileGrid {
        TileGrid::new(self.driver.clone())
    }

    /// Waits until the result grid has rendered and settled.
    ///
    /// Hard-fails only when no tile ever appears; a grid that keeps
    /// shuffling past the budget is reported as best-effort.
    pub async fn wait_for_results(&self) -> Result<Stability> {
        info!("Waiting for search results...");
        let outcome = wait::wait_for_stable(&self.grid(), self.quiet, self.timeout)
            .await
            .context("Search results never appeared")?;

        // Let late price/badge rerenders inside existing tiles land.
        sleep(Duration::from_millis(400)).await;
        Ok(outcome)
    }

    /// Number of result tiles currently in the DOM.
    pub async fn tile_count(&self) -> Result<usize> {
        let tiles = self.driver.find_all(By::Css(results::TILE)).await.unwrap_or_default();
        debug!("Visible tile count: {}", tiles.len());
        Ok(tiles.len())
    }

    /// Tile handle at `index`.
    pub fn tile(&self, index: usize) -> Tile {
        Tile::new(self.driver.clone(), index)
    }

    /// All tile handles on the current page.
    pub async fn all_tiles(&self) -> Result<Vec<Tile>> {
        let count = self.tile_count().await?;
        Ok((0..count).map(|i| self.tile(i)).collect())
    }

    /// Blocks until at least `n` tiles are rendered.
    pub async fn wait_until_at_least(&self, n: usize, timeout: Duration) -> Result<()> {
        debug!("Waiting until at least {} results are loaded...", n);
        let start = tokio::time::Instant::now();
        while start.elapsed() < timeout {
            if self.tile_count().await? >= n {
                return Ok(());
            }
            sleep(Duration::from_millis(250)).await;
        }
        anyhow::bail!("Timed out waiting for at least {} results", n)
    }

    /// Titles of the first `limit` tiles.
    pub async fn top_titles(&self, limit: usize) -> Result<Vec<String>> {
        info!("Collecting top {} product titles", limit);
        self.wait_until_at_least(limit.min(5), Duration::from_secs(10)).await.ok();

        let count = self.tile_count().await?.min(limit);
        let mut titles = Vec::with_capacity(count);
        for index in 0..count {
            let title = self.tile(index).title().await?;
            titles.push(title);
        }
        Ok(titles)
    }

    /// Raw text of the results summary label, if rendered.
    pub async fn label_text(&self) -> Result<Option<String>> {
        base::text_of(&self.driver, results::INFO_BAR).await
    }

    /// Total result count advertised by the summary label.
    pub async fn label_total(&self) -> Result<Option<u64>> {
        Ok(self.label_text().await?.as_deref().and_then(parse_label_total))
    }

    /// Average of all parseable tile prices on the current page.
    ///
    /// Missing and malformed prices are skipped before aggregation;
    /// `None` means no tile had a single definite price.
    pub async fn average_price(&self) -> Result<Option<f64>> {
        Ok(price::average(&self.collect_prices().await?))
    }

    /// All parseable tile prices on the current page.
    pub async fn collect_prices(&self) -> Result<Vec<f64>> {
        let count = self.tile_count().await?;
        let mut values = Vec::new();

        for index in 0..count {
            let raw = self.tile(index).price_text().await.unwrap_or_default();
            if let Some(value) = price::parse_currency(&raw) {
                values.push(value);
            }
        }

        Ok(values)
    }

    /// Raw price text of every tile, parseable or not.
    pub async fn raw_prices(&self) -> Result<Vec<String>> {
        let count = self.tile_count().await?;
        let mut raws = Vec::with_capacity(count);
        for index in 0..count {
            raws.push(self.tile(index).price_text().await.unwrap_or_default());
        }
        Ok(raws)
    }

    /// Scrolls toward the pagination bar so lazy tiles finish loading.
    pub async fn scroll_until_pagination_visible(&self, timeout: Duration) -> Result<()> {
        debug!("Scrolling until pagination bar is visible...");
        let start = tokio::time::Instant::now();
        while start.elapsed() < timeout {
            if base::visible(&self.driver, results::PAGINATION_ITEM).await? {
                debug!("Pagination bar visible, page fully loaded");
                return Ok(());
            }
            self.driver
                .execute("window.scrollBy(0, window.innerHeight);", Vec::new())
                .await
                .context("Scroll failed")?;
            sleep(Duration::from_millis(500)).await;
        }
        warn!("Pagination bar did not appear within {:?}", timeout);
        Ok(())
    }

    /// Navigates to the next result page if one exists.
    ///
    /// Returns `false` when there is no next-page link; on success the
    /// new page is already stabilized.
    pub async fn next_page(&self) -> Result<bool> {
        info!("Attempting to navigate to next page...");
        self.scroll_until_pagination_visible(Duration::from_secs(5)).await?;

        if !base::visible(&self.driver, results::NEXT_PAGE).await? {
            warn!("Next page link not visible");
            return Ok(false);
        }

        let old_url = self.driver.current_url().await.context("Failed to read URL")?.to_string();

        let next = self
            .driver
            .find(By::Css(results::NEXT_PAGE))
            .await
            .context("Next page link vanished")?;
        next.scroll_into_view().await.context("Failed to scroll to pagination")?;
        next.click().await.context("Failed to click next page")?;

        // Wait for the URL to actually move before trusting the DOM.
        let start = tokio::time::Instant::now();
        loop {
            let url = self.driver.current_url().await.context("Failed to read URL")?.to_string();
            if url != old_url {
                debug!("Navigated: {} -> {}", old_url, url);
                break;
            }
            if start.elapsed() >= Duration::from_secs(15) {
                anyhow::bail!("URL did not change after clicking next page");
            }
            sleep(Duration::from_millis(250)).await;
        }

        self.wait_for_results().await?;
        info!("Next results page loaded");
        Ok(true)
    }

    /// Unique rounded left-edge positions of the tiles: the column count
    /// of the current layout.
    pub async fn column_positions(&self) -> Result<Vec<i64>> {
        let script = format!(
            r#"
            var tiles = document.querySelectorAll("{}");
            var lefts = [];
            tiles.forEach(function (el) {{
                lefts.push(Math.round(el.getBoundingClientRect().left));
            }});
            return lefts;
            "#,
            results::TILE
        );

        let ret =
            self.driver.execute(&script, Vec::new()).await.context("Layout probe failed")?;
        let mut lefts: Vec<i64> = ret.convert().context("Unexpected layout probe shape")?;
        lefts.sort_unstable();
        lefts.dedup();
        Ok(lefts)
    }

    /// Current page URL.
    pub async fn current_url(&self) -> Result<String> {
        Ok(self.driver.current_url().await.context("Failed to read URL")?.to_string())
    }
}

/// Extracts the total from a results summary label such as
/// `"1-16 of over 40,000 results for \"mouse\""`.
pub fn parse_label_total(text: &str) -> Option<u64> {
    let after_of = text.split(" of ").nth(1)?;
    // Cut before the "results for ..." tail so query text cannot leak in.
    let total_part = after_of.split("result").next().unwrap_or(after_of);
    let digits: String = total_part.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label_total_plain() {
        assert_eq!(parse_label_total("1-16 of 312 results"), Some(312));
    }

    #[test]
    fn test_parse_label_total_with_grouping() {
        assert_eq!(parse_label_total("1-16 of over 40,000 results"), Some(40_000));
        assert_eq!(parse_label_total("1-48 of over 1,000 results for \"mouse\""), Some(1_000));
    }

    #[test]
    fn test_parse_label_total_absent() {
        assert_eq!(parse_label_total(""), None);
        assert_eq!(parse_label_total("no results found"), None);
        assert_eq!(parse_label_total("1-16 results"), None);
    }
}
