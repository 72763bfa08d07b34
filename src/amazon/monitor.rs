//! Console and network health capture for a loaded page.
//!
//! WebDriver has no event stream, so capture is script-based: a hook
//! snippet is installed into the live document and buffers console
//! errors/warnings, uncaught exceptions, and failed fetch/XHR responses.
//! Draining additionally sweeps resource timing entries, which cover
//! request failures from before the hooks landed.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thirtyfour::WebDriver;
use tracing::{debug, warn};

/// Hook installer. Idempotent per document; navigation wipes it.
const INSTALL: &str = r#"
(function () {
    if (window.__pageLog) return;
    var log = { console: [], network: [] };
    window.__pageLog = log;

    function wrap(level, fn) {
        return function () {
            try {
                var parts = [];
                for (var i = 0; i < arguments.length; i++) parts.push(String(arguments[i]));
                log.console.push({ level: level, text: parts.join(' ') });
            } catch (e) {}
            return fn.apply(console, arguments);
        };
    }
    console.error = wrap('error', console.error);
    console.warn = wrap('warning', console.warn);

    window.addEventListener('error', function (e) {
        log.console.push({ level: 'error', text: 'Uncaught ' + e.message });
    });
    window.addEventListener('unhandledrejection', function (e) {
        log.console.push({ level: 'error', text: 'Uncaught (in promise) ' + String(e.reason) });
    });

    if (window.fetch) {
        var origFetch = window.fetch;
        window.fetch = function () {
            return origFetch.apply(window, arguments).then(function (resp) {
                if (resp.status >= 400) log.network.push({ status: resp.status, url: resp.url });
                return resp;
            });
        };
    }

    var origOpen = XMLHttpRequest.prototype.open;
    XMLHttpRequest.prototype.open = function (method, url) {
        var xhr = this;
        xhr.addEventListener('loadend', function () {
            if (xhr.status >= 400) log.network.push({ status: xhr.status, url: String(url) });
        });
        return origOpen.apply(this, arguments);
    };
})();
"#;

/// Drains the hook buffer and sweeps resource timing for late 4xx/5xx.
const DRAIN: &str = r#"
var log = window.__pageLog || { console: [], network: [] };
var resources = [];
try {
    resources = performance.getEntriesByType('resource')
        .filter(function (e) { return e.responseStatus && e.responseStatus >= 400; })
        .map(function (e) { return { status: e.responseStatus, url: e.name }; });
} catch (e) {}
return { console: log.console, network: log.network.concat(resources) };
"#;

/// One captured console message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleEntry {
    pub level: String,
    pub text: String,
}

/// One failed request observed on the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkEntry {
    pub status: u16,
    pub url: String,
}

/// Everything captured on one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLog {
    #[serde(default)]
    pub console: Vec<ConsoleEntry>,
    #[serde(default)]
    pub network: Vec<NetworkEntry>,
}

/// Installs and drains page health hooks on the current document.
pub struct Monitor {
    driver: WebDriver,
}

impl Monitor {
    pub fn new(driver: WebDriver) -> Self {
        Self { driver }
    }

    /// Installs the capture hooks into the current document.
    pub async fn install(&self) -> Result<()> {
        debug!("Installing page health hooks");
        self.driver
            .execute(INSTALL, Vec::new())
            .await
            .context("Failed to install page health hooks")?;
        Ok(())
    }

    /// Reads everything captured so far on the current document.
    pub async fn drain(&self) -> Result<PageLog> {
        let ret = self
            .driver
            .execute(DRAIN, Vec::new())
            .await
            .context("Failed to read page health buffer")?;

        let log: PageLog = ret.convert().context("Unexpected page health buffer shape")?;
        if !log.console.is_empty() || !log.network.is_empty() {
            warn!(
                "Page health: {} console entries, {} failed requests",
                log.console.len(),
                log.network.len()
            );
        }
        Ok(log)
    }
}

/// Console entries that indicate broken page scripts rather than noise.
pub fn script_errors(entries: &[ConsoleEntry]) -> Vec<&ConsoleEntry> {
    const MARKERS: [&str; 4] = ["typeerror", "referenceerror", "syntaxerror", "uncaught"];

    entries
        .iter()
        .filter(|e| {
            let text = e.text.to_lowercase();
            MARKERS.iter().any(|m| text.contains(m))
        })
        .collect()
}

/// Failed requests worth failing a run over.
///
/// Ad, tracking, metrics, favicon, and suggestion endpoints fail
/// routinely on the live storefront and are ignored.
pub fn critical_failures(entries: &[NetworkEntry]) -> Vec<&NetworkEntry> {
    const IGNORED: [&str; 6] =
        ["/suggestions", "ads", "pixel", "metrics", "favicon", "/ah/ajax/counter"];

    entries
        .iter()
        .filter(|e| e.status >= 400 && !IGNORED.iter().any(|frag| e.url.contains(frag)))
        .collect()
}
