//! One result tile: title, price text, image.

use crate::amazon::selectors::{results, tile};
use crate::pages::base;
use anyhow::{Context, Result};
use std::time::Duration;
use thirtyfour::prelude::*;
use tokio::time::sleep;
use tracing::{debug, trace};

/// Handle to the result tile at a fixed index.
///
/// The element is re-queried on every access; tiles get re-rendered
/// while the grid is still settling and stale handles would break.
pub struct Tile {
    driver: WebDriver,
    index: usize,
}

impl Tile {
    pub fn new(driver: WebDriver, index: usize) -> Self {
        Self { driver, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The tile's root element, if it is currently in the DOM.
    async fn root(&self) -> Result<Option<WebElement>> {
        let tiles = self.driver.find_all(By::Css(results::TILE)).await.unwrap_or_default();
        Ok(tiles.into_iter().nth(self.index))
    }

    /// Scrolls the tile into view so lazy content starts loading.
    pub async fn scroll_into_view(&self) -> Result<()> {
        if let Some(root) = self.root().await? {
            root.scroll_into_view().await.context("Failed to scroll tile into view")?;
            sleep(Duration::from_millis(200)).await;
        }
        Ok(())
    }

    /// Polls a child element for visibility and returns it when shown.
    async fn child_when_visible(&self, css: &str) -> Result<Option<WebElement>> {
        for _ in 0..base::POLL_RETRIES {
            if let Some(root) = self.root().await? {
                if let Ok(element) = root.find(By::Css(css)).await {
                    if element.is_displayed().await.unwrap_or(false) {
                        return Ok(Some(element));
                    }
                }
            }
            sleep(base::POLL_INTERVAL).await;
        }
        Ok(None)
    }

    /// The tile's title text. A tile with no visible title is a broken
    /// card, so this errors rather than returning an empty string.
    pub async fn title(&self) -> Result<String> {
        self.scroll_into_view().await?;

        let element = self
            .child_when_visible(tile::TITLE)
            .await?
            .with_context(|| format!("No visible title on tile {}", self.index))?;

        let text = element.text().await.context("Failed to read title text")?;
        let text = text.trim().to_string();
        trace!("Tile {} title: {}", self.index, text);
        Ok(text)
    }

    /// The tile's raw price text, or an empty string when no price is
    /// rendered. Missing prices are routine; callers classify them.
    pub async fn price_text(&self) -> Result<String> {
        self.scroll_into_view().await?;

        match self.child_when_visible(tile::PRICE).await? {
            Some(element) => {
                let text = element.text().await.unwrap_or_default();
                Ok(text.trim().to_string())
            }
            None => {
                debug!("Price missing for tile {}", self.index);
                Ok(String::new())
            }
        }
    }

    /// Image URL without waiting for visibility (`src` then `data-src`),
    /// or an empty string when the tile carries no image.
    pub async fn image_url(&self) -> Result<String> {
        let Some(root) = self.root().await? else {
            return Ok(String::new());
        };

        let Ok(img) = root.find(By::Css(tile::IMAGE)).await else {
            return Ok(String::new());
        };

        if let Some(src) = img.attr("src").await.unwrap_or(None) {
            if !src.is_empty() {
                return Ok(src);
            }
        }
        Ok(img.attr("data-src").await.unwrap_or(None).unwrap_or_default())
    }
}
