//! Home page: navigation, locale setup, and search submission.

use crate::amazon::locales::Locale;
use crate::amazon::selectors::nav;
use crate::amazon::session::{Device, Session};
use crate::config::Config;
use crate::pages::base;
use anyhow::{Context, Result};
use std::time::Duration;
use thirtyfour::prelude::*;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// How a search gets submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Click the magnifier button.
    #[default]
    Button,
    /// Press Enter inside the input.
    EnterKey,
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "button" => Ok(SearchMode::Button),
            "enter" | "enterkey" => Ok(SearchMode::EnterKey),
            _ => Err(format!("Unknown search mode: {}. Use: button, enter", s)),
        }
    }
}

/// The storefront home page.
pub struct HomePage {
    driver: WebDriver,
    base_url: String,
    locale: Locale,
    device: Device,
}

impl HomePage {
    pub fn new(session: &Session, config: &Config) -> Self {
        Self {
            driver: session.driver().clone(),
            base_url: config.base_url(),
            locale: config.locale,
            device: session.device(),
        }
    }

    /// Selector for the search input the current device layout renders.
    fn search_box_selector(&self) -> &'static str {
        if self.device.is_narrow() {
            nav::MOBILE_SEARCH_BOX
        } else {
            nav::SEARCH_BOX
        }
    }

    /// Navigates to the home page, applies locale preferences, and clears
    /// whatever modal or interstitial the storefront decided to show.
    pub async fn open(&self) -> Result<()> {
        info!("Navigating to {}", self.base_url);
        self.driver.goto(&self.base_url).await.context("Failed to open home page")?;

        // Locale cookies only stick once the storefront domain is loaded;
        // reload so the preference takes effect.
        let session_cookies = Session::apply_locale_cookies_for(&self.driver, self.locale).await;
        if let Err(e) = session_cookies {
            warn!("Locale cookie setup failed: {}", e);
        } else {
            self.driver.refresh().await.context("Failed to reload after locale setup")?;
        }

        if base::click_if_visible(&self.driver, nav::LOCATION_DISMISS).await? {
            debug!("Dismissed delivery-location modal");
            sleep(Duration::from_millis(500)).await;
        }
        self.dismiss_interstitials().await?;

        base::wait_visible(&self.driver, self.search_box_selector(), Duration::from_secs(15))
            .await
            .context("Search box never became visible on the home page")?;

        info!("Home page ready");
        Ok(())
    }

    /// Clears the occasional "continue shopping" interstitial.
    pub async fn dismiss_interstitials(&self) -> Result<()> {
        if base::click_if_visible(&self.driver, nav::CONTINUE_SHOPPING).await? {
            warn!("Continue-shopping interstitial detected, clicking through");
            sleep(Duration::from_millis(500)).await;
        }
        Ok(())
    }

    /// Types `term` into the search input and submits it.
    pub async fn search(&self, term: &str, mode: SearchMode) -> Result<()> {
        let selector = self.search_box_selector();
        let input = base::wait_visible(&self.driver, selector, Duration::from_secs(10))
            .await
            .context("Search input not available")?;

        base::type_into(&input, term).await?;

        match mode {
            SearchMode::Button => {
                info!("Submitting search via button: {:?}", term);
                let button = self
                    .driver
                    .find(By::Css(nav::SEARCH_SUBMIT))
                    .await
                    .context("Search submit button not found")?;
                button.click().await.context("Failed to click search button")?;
            }
            SearchMode::EnterKey => {
                info!("Submitting search via Enter: {:?}", term);
                input.send_keys(Key::Enter).await.context("Failed to press Enter")?;
            }
        }

        Ok(())
    }

    /// Clears the search input.
    pub async fn clear_search(&self) -> Result<()> {
        let input =
            base::wait_visible(&self.driver, self.search_box_selector(), Duration::from_secs(10))
                .await?;
        input.clear().await.context("Failed to clear search input")?;
        Ok(())
    }

    /// Whether the search box is currently visible (UI stability check).
    pub async fn search_box_visible(&self) -> Result<bool> {
        base::visible(&self.driver, self.search_box_selector()).await
    }

    /// Current page URL.
    pub async fn current_url(&self) -> Result<String> {
        Ok(self.driver.current_url().await.context("Failed to read URL")?.to_string())
    }
}
