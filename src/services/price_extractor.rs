use std::time::Duration;

use crate::{
    domain::{dedup_targets, ExtractionReport, PageTarget, PriceCatalog, RawPriceList},
    error::ExtractionError,
};

use super::{Browser, BrowserLauncher, SessionGuard};

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub max_products: usize,
    pub timeout: Duration,
    pub default_selector: String,
}

/// Scrapes price texts from product listing pages with one browser session
/// per run. Pages are visited one after another, never concurrently.
pub struct PriceExtractor<L: BrowserLauncher> {
    launcher: L,
    options: ExtractOptions,
}

impl<L: BrowserLauncher> PriceExtractor<L> {
    pub fn new(launcher: L, options: ExtractOptions) -> Self {
        PriceExtractor { launcher, options }
    }

    /// Scrapes every target in order and stops at the first page that fails.
    ///
    /// An empty target list returns an empty catalog without starting a
    /// browser.
    pub async fn extract(&self, targets: Vec<PageTarget>) -> Result<PriceCatalog, ExtractionError> {
        let targets = dedup_targets(targets);
        if targets.is_empty() {
            return Ok(PriceCatalog::new());
        }

        let mut session = self.start_session().await?;
        let result = scrape_all(&mut *session, &targets, &self.options).await;
        close_session(session).await;

        if let Err(ref e) = result {
            log::error!("Error occurred while scraping prices: {}", e);
        }
        result
    }

    /// Scrapes every target in order, recording a failed page in the report
    /// and moving on to the next one.
    ///
    /// Only a browser that cannot be started fails the whole run.
    pub async fn extract_each(
        &self,
        targets: Vec<PageTarget>,
    ) -> Result<ExtractionReport, ExtractionError> {
        let targets = dedup_targets(targets);
        let mut report = ExtractionReport::default();
        if targets.is_empty() {
            return Ok(report);
        }

        let mut session = self.start_session().await?;

        for target in targets.iter() {
            let outcome = scrape_page(&mut *session, target, &self.options).await;
            if let Err(ref e) = outcome {
                log::error!("Error occurred while scraping prices: {}", e);
            }
            report.record(target.url.as_str(), outcome);
        }

        close_session(session).await;

        Ok(report)
    }

    async fn start_session(&self) -> Result<SessionGuard<L::Browser>, ExtractionError> {
        SessionGuard::acquire(&self.launcher).await.map_err(|e| {
            let e = ExtractionError::Session(e);
            log::error!("Error occurred while scraping prices: {}", e);
            e
        })
    }
}

async fn close_session<B: Browser>(session: SessionGuard<B>) {
    if let Err(e) = session.release().await {
        log::warn!("Failed to close browser session: {}", e);
    }
}

async fn scrape_all<B: Browser>(
    browser: &mut B,
    targets: &[PageTarget],
    options: &ExtractOptions,
) -> Result<PriceCatalog, ExtractionError> {
    let mut catalog = PriceCatalog::new();
    for target in targets {
        let prices = scrape_page(browser, target, options).await?;
        catalog.insert(target.url.as_str(), prices);
    }
    Ok(catalog)
}

async fn scrape_page<B: Browser>(
    browser: &mut B,
    target: &PageTarget,
    options: &ExtractOptions,
) -> Result<RawPriceList, ExtractionError> {
    let url = target.url.as_str();
    let selector = target.selector_or(&options.default_selector);

    log::info!("Scraping prices from {} with selector \"{}\"", url, selector);

    browser
        .goto(url)
        .await
        .map_err(|source| ExtractionError::Navigation {
            url: url.to_string(),
            source,
        })?;

    let elements = browser
        .find_visible(selector, options.timeout)
        .await
        .map_err(|source| ExtractionError::Elements {
            url: url.to_string(),
            selector: selector.to_string(),
            source,
        })?;

    let mut prices: RawPriceList = Vec::with_capacity(elements.len().min(options.max_products));
    for element in elements.iter().take(options.max_products) {
        let text = browser
            .text(element)
            .await
            .map_err(|source| ExtractionError::ElementText {
                url: url.to_string(),
                source,
            })?;
        prices.push(text.trim().to_string());
    }

    log::info!(
        "Found {} prices on {} ({} matched)",
        prices.len(),
        url,
        elements.len()
    );

    Ok(prices)
}
