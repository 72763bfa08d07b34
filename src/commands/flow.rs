//! The end-to-end search flow: home → search → results → pagination.

use crate::amazon::locales::Locale;
use crate::amazon::monitor::{self, Monitor};
use crate::amazon::session::{Device, Session};
use crate::checks::{self, PriceAudit};
use crate::config::Config;
use crate::data::KeywordVariants;
use crate::pages::{HomePage, ResultsPage, SearchMode};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Everything observed on one results page.
#[derive(Debug, Clone, Serialize)]
pub struct PageStats {
    pub page: u32,
    pub url: String,
    pub tiles: usize,
    /// Tiles carrying a resolvable image URL.
    pub images: usize,
    pub label_total: Option<u64>,
    pub titles: Vec<String>,
    pub price: PriceAudit,
    pub currency_ratio: f64,
}

/// Full record of one flow run.
#[derive(Debug, Clone, Serialize)]
pub struct FlowReport {
    pub query: String,
    pub base_url: String,
    pub locale: Locale,
    pub device: Device,
    /// Search submission to stable grid, in seconds.
    pub load_seconds: f64,
    /// Whether the first page genuinely quiesced (vs. best-effort).
    pub settled: bool,
    pub pages: Vec<PageStats>,
    /// Share of first-page top titles matching a keyword variant, when
    /// variants exist for the query.
    pub relevance: Option<f64>,
    /// Layout columns observed on the last visited page.
    pub columns: usize,
    pub console_errors: Vec<String>,
    pub network_failures: Vec<String>,
}

impl FlowReport {
    /// First-page price audit, if any page was visited.
    pub fn first_page(&self) -> Option<&PageStats> {
        self.pages.first()
    }

    /// Whether every budgeted check came in under its threshold.
    pub fn healthy(&self) -> bool {
        let prices_ok = self
            .first_page()
            .map(|p| p.price.valid_ratio() >= checks::MIN_PRICE_VALID_RATIO)
            .unwrap_or(false);
        let currency_ok = self
            .first_page()
            .map(|p| p.currency_ratio >= checks::MIN_CURRENCY_RATIO)
            .unwrap_or(false);
        let relevance_ok =
            self.relevance.map(|r| r >= checks::MIN_RELEVANCE_RATIO).unwrap_or(true);
        let load_ok = self.load_seconds <= checks::MAX_LOAD_SECONDS;
        let layout_ok = checks::columns_acceptable(self.device, self.columns);

        prices_ok
            && currency_ok
            && relevance_ok
            && load_ok
            && layout_ok
            && self.console_errors.is_empty()
            && self.network_failures.is_empty()
    }
}

/// Drives one complete search flow through a live browser session.
pub struct FlowCommand {
    config: Config,
}

impl FlowCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the flow for `query` and returns the observations.
    pub async fn execute(&self, query: &str, mode: SearchMode) -> Result<FlowReport> {
        let session =
            Session::connect(&self.config).await.context("Failed to start browser session")?;

        let result = self.run_flow(&session, query, mode).await;

        // Close the browser regardless of how the flow went.
        if let Err(e) = session.quit().await {
            warn!("Session teardown failed: {}", e);
        }

        result
    }

    async fn run_flow(
        &self,
        session: &Session,
        query: &str,
        mode: SearchMode,
    ) -> Result<FlowReport> {
        let driver = session.driver().clone();
        let home = HomePage::new(session, &self.config);
        let results = ResultsPage::new(driver.clone(), &self.config);
        let page_monitor = Monitor::new(driver.clone());

        home.open().await?;

        info!("Searching for: {:?}", query);
        let grid = results.grid();
        let (elapsed, outcome) = crate::wait::measure_settled(
            &grid,
            self.config.quiet(),
            self.config.results_timeout(),
            || async {
                home.search(query, mode).await?;
                // Hooks land on the fresh document; anything earlier is
                // swept from resource timing at drain.
                page_monitor.install().await.ok();
                Ok(())
            },
        )
        .await
        .context("Search results did not load")?;

        let load_seconds = elapsed.as_secs_f64();
        info!("Results stable after {:.2}s ({:?})", load_seconds, outcome);

        let mut pages = Vec::new();
        for page in 1..=self.config.max_pages {
            pages.push(self.collect_page(&results, page).await?);

            if page < self.config.max_pages {
                if !results.next_page().await? {
                    debug!("No further pages after page {}", page);
                    break;
                }
            }
        }

        let columns = checks::column_count(&results.column_positions().await.unwrap_or_default());

        let page_log = page_monitor.drain().await.unwrap_or_default();
        let console_errors: Vec<String> = monitor::script_errors(&page_log.console)
            .into_iter()
            .map(|e| format!("{}: {}", e.level.to_uppercase(), e.text))
            .collect();
        let network_failures: Vec<String> = monitor::critical_failures(&page_log.network)
            .into_iter()
            .map(|e| format!("{} -> {}", e.status, e.url))
            .collect();

        let relevance = KeywordVariants::bundled()
            .ok()
            .and_then(|variants| variants.get(query).map(<[String]>::to_vec))
            .and_then(|variants| {
                pages.first().map(|p| checks::relevance_ratio(&p.titles, &variants))
            });

        Ok(FlowReport {
            query: query.to_string(),
            base_url: self.config.base_url(),
            locale: self.config.locale,
            device: self.config.device,
            load_seconds,
            settled: outcome.is_settled(),
            pages,
            relevance,
            columns,
            console_errors,
            network_failures,
        })
    }

    async fn collect_page(&self, results: &ResultsPage, page: u32) -> Result<PageStats> {
        debug!("Collecting page {}", page);
        results.scroll_until_pagination_visible(std::time::Duration::from_secs(5)).await?;

        let tiles = results.tile_count().await?;
        let label_total = results.label_total().await.unwrap_or(None);

        let titles = match results.top_titles(self.config.top_titles).await {
            Ok(titles) => titles,
            Err(e) => {
                warn!("Title extraction incomplete on page {}: {}", page, e);
                Vec::new()
            }
        };

        let mut images = 0;
        for tile in results.all_tiles().await? {
            if !tile.image_url().await.unwrap_or_default().is_empty() {
                images += 1;
            }
        }

        let raws = results.raw_prices().await?;
        let price = PriceAudit::scan(&raws);
        let currency_ratio =
            checks::currency_ratio(&raws, self.config.locale.currency_symbol());

        if !price.malformed.is_empty() {
            warn!("Malformed prices on page {}: {:?}", page, price.malformed);
        }
        info!(
            "Page {}: {} tiles, {} parsed prices, average {:?}",
            page,
            tiles,
            price.values.len(),
            price.average()
        );

        Ok(PageStats {
            page,
            url: results.current_url().await?,
            tiles,
            images,
            label_total,
            titles,
            price,
            currency_ratio,
        })
    }
}
