//! WebDriver session management and device profiles.

use crate::amazon::locales::Locale;
use crate::config::Config;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thirtyfour::prelude::*;
use thirtyfour::Cookie;
use tracing::{debug, info, warn};

/// Device profile emulated by resizing the browser window.
///
/// Width drives which search input the storefront renders; the page
/// objects pick their locators off [`Device::is_narrow`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Desktop,
    Phone,
    Tablet,
}

impl Device {
    /// Viewport size in CSS pixels.
    pub fn viewport(&self) -> (u32, u32) {
        match self {
            Device::Desktop => (1280, 800),
            Device::Phone => (390, 844),
            Device::Tablet => (834, 1194),
        }
    }

    /// Whether the storefront serves its narrow-viewport layout.
    pub fn is_narrow(&self) -> bool {
        self.viewport().0 < 600
    }

    /// Returns all device profiles.
    pub fn all() -> &'static [Device] {
        &[Device::Desktop, Device::Phone, Device::Tablet]
    }
}

impl std::str::FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "desktop" => Ok(Device::Desktop),
            "phone" | "iphone" | "mobile" => Ok(Device::Phone),
            "tablet" | "ipad" => Ok(Device::Tablet),
            _ => Err(format!("Unknown device: {}. Use: desktop, phone, tablet", s)),
        }
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Device::Desktop => write!(f, "desktop"),
            Device::Phone => write!(f, "phone"),
            Device::Tablet => write!(f, "tablet"),
        }
    }
}

/// One browser session against a WebDriver endpoint.
pub struct Session {
    driver: WebDriver,
    device: Device,
}

impl Session {
    /// Connects to the configured WebDriver endpoint and applies the
    /// device profile.
    pub async fn connect(config: &Config) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if config.headless {
            caps.set_headless().context("Failed to enable headless mode")?;
        }
        caps.add_arg("--disable-gpu").context("Failed to set browser arguments")?;

        // Device emulation is viewport-only; width decides which layout
        // the storefront serves.
        let (width, height) = config.device.viewport();
        caps.add_arg(&format!("--window-size={},{}", width, height))
            .context("Failed to set viewport size")?;

        info!("Connecting to WebDriver at {}", config.webdriver_url);
        let driver = WebDriver::new(&config.webdriver_url, caps)
            .await
            .context("Failed to create WebDriver session")?;
        debug!("Viewport set to {}x{} ({})", width, height, config.device);

        Ok(Self { driver, device: config.device })
    }

    /// The underlying driver handle; page objects clone it freely.
    pub fn driver(&self) -> &WebDriver {
        &self.driver
    }

    /// The emulated device profile.
    pub fn device(&self) -> Device {
        self.device
    }

    /// Sets the language and currency preference cookies for a locale.
    pub async fn apply_locale_cookies(&self, locale: Locale) -> Result<()> {
        Self::apply_locale_cookies_for(&self.driver, locale).await
    }

    /// Cookie setup for callers that only hold a driver handle.
    ///
    /// Cookies land on the currently loaded document's domain, so the
    /// storefront must already be open. Refusals (redirect hosts, odd
    /// cookie policies) are logged rather than failed on.
    pub async fn apply_locale_cookies_for(driver: &WebDriver, locale: Locale) -> Result<()> {
        debug!("Applying locale cookies for {}", locale);

        let prefs = [("lc-main", locale.language()), ("i18n-prefs", locale.currency())];
        for (name, value) in prefs {
            if let Err(e) = driver.add_cookie(Cookie::new(name, value)).await {
                warn!("Could not set cookie {}: {}", name, e);
            }
        }

        Ok(())
    }

    /// Ends the session and closes the browser.
    pub async fn quit(self) -> Result<()> {
        self.driver.quit().await.context("Failed to close WebDriver session")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_device_viewports() {
        assert_eq!(Device::Desktop.viewport(), (1280, 800));
        assert_eq!(Device::Phone.viewport(), (390, 844));
        assert_eq!(Device::Tablet.viewport(), (834, 1194));
    }

    #[test]
    fn test_device_narrow_layout() {
        assert!(!Device::Desktop.is_narrow());
        assert!(Device::Phone.is_narrow());
        assert!(!Device::Tablet.is_narrow());
    }

    #[test]
    fn test_device_parsing() {
        assert_eq!(Device::from_str("desktop").unwrap(), Device::Desktop);
        assert_eq!(Device::from_str("iPhone").unwrap(), Device::Phone);
        assert_eq!(Device::from_str("mobile").unwrap(), Device::Phone);
        assert_eq!(Device::from_str("iPad").unwrap(), Device::Tablet);
        assert!(Device::from_str("watch").is_err());
    }

    #[test]
    fn test_device_display_and_default() {
        assert_eq!(Device::Desktop.to_string(), "desktop");
        assert_eq!(Device::Phone.to_string(), "phone");
        assert_eq!(Device::Tablet.to_string(), "tablet");
        assert_eq!(Device::default(), Device::Desktop);
        assert_eq!(Device::all().len(), 3);
    }

    #[test]
    fn test_device_serde() {
        let json = serde_json::to_string(&Device::Phone).unwrap();
        assert_eq!(json, "\"phone\"");
        let parsed: Device = serde_json::from_str("\"tablet\"").unwrap();
        assert_eq!(parsed, Device::Tablet);
    }
}
