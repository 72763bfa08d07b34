//! Shared element helpers the page objects build on.

use anyhow::{Context, Result};
use std::time::Duration;
use thirtyfour::prelude::*;
use tokio::time::sleep;
use tracing::trace;

/// Default attempts for polling-based visibility checks.
pub const POLL_RETRIES: usize = 6;

/// Default interval between polling attempts.
pub const POLL_INTERVAL: Duration = Duration::from_millis(300);

/// Whether any element matching `css` is currently rendered and visible.
///
/// Missing elements are an ordinary `false`, not an error.
pub async fn visible(driver: &WebDriver, css: &str) -> Result<bool> {
    let elements = driver.find_all(By::Css(css)).await.unwrap_or_default();
    match elements.first() {
        Some(element) => Ok(element.is_displayed().await.unwrap_or(false)),
        None => Ok(false),
    }
}

/// Polls for visibility of `css`, re-querying on every attempt so stale
/// elements cannot poison the check. Returns whether it became visible.
pub async fn visible_with_polling(
    driver: &WebDriver,
    css: &str,
    retries: usize,
    interval: Duration,
) -> Result<bool> {
    for attempt in 0..retries {
        if visible(driver, css).await? {
            return Ok(true);
        }
        trace!("'{}' not visible on attempt {}", css, attempt + 1);
        sleep(interval).await;
    }
    Ok(false)
}

/// Waits until `css` is visible, failing after `timeout`.
pub async fn wait_visible(driver: &WebDriver, css: &str, timeout: Duration) -> Result<WebElement> {
    let start = tokio::time::Instant::now();
    loop {
        if visible(driver, css).await? {
            return driver
                .find(By::Css(css))
                .await
                .with_context(|| format!("Element disappeared after becoming visible: {}", css));
        }
        if start.elapsed() >= timeout {
            anyhow::bail!("Timed out after {:?} waiting for element: {}", timeout, css);
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// Clears an input and types fresh text into it.
pub async fn type_into(element: &WebElement, text: &str) -> Result<()> {
    element.clear().await.context("Failed to clear input")?;
    element.send_keys(text).await.context("Failed to type into input")?;
    Ok(())
}

/// Clicks the first match of `css` if it is visible; reports whether a
/// click happened. Used for modals and interstitials that may or may not
/// appear.
pub async fn click_if_visible(driver: &WebDriver, css: &str) -> Result<bool> {
    if !visible(driver, css).await? {
        return Ok(false);
    }
    let element = driver.find(By::Css(css)).await.context("Dismissable element vanished")?;
    element.click().await.context("Failed to click dismissable element")?;
    Ok(true)
}

/// Trimmed text of the first match of `css`, or `None` when absent.
pub async fn text_of(driver: &WebDriver, css: &str) -> Result<Option<String>> {
    let elements = driver.find_all(By::Css(css)).await.unwrap_or_default();
    match elements.first() {
        Some(element) => {
            let text = element.text().await.unwrap_or_default();
            let trimmed = text.trim();
            Ok(if trimmed.is_empty() { None } else { Some(trimmed.to_string()) })
        }
        None => Ok(None),
    }
}
