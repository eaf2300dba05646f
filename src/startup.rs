use anyhow::Context;
use serde::Serialize;

use crate::{
    configuration::{FailurePolicy, Settings},
    domain::{Comparison, PriceCatalog},
    services::{BrowserLauncher, DealComparator, DroidLauncher, PriceExtractor},
};

#[derive(Debug, Serialize)]
pub struct FailedPage {
    pub url: String,
    pub reason: String,
}

/// Everything one run produced, ready to print.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub product_prices: PriceCatalog,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_pages: Vec<FailedPage>,
    pub best_deals: Comparison,
}

pub async fn run(settings: &Settings) -> anyhow::Result<RunReport> {
    let launcher = DroidLauncher::new(settings.browser.clone());
    run_with(launcher, settings).await
}

/// Extracts prices with browsers from `launcher`, then compares them.
pub async fn run_with<L: BrowserLauncher>(
    launcher: L,
    settings: &Settings,
) -> anyhow::Result<RunReport> {
    let targets = settings.page_targets()?;
    let extractor = PriceExtractor::new(launcher, settings.scrape.extract_options());
    let comparator = DealComparator::new(settings.pricing.parser());

    let (product_prices, failed_pages) = match settings.scrape.failure_policy {
        FailurePolicy::Abort => {
            let catalog = extractor
                .extract(targets)
                .await
                .context("Price extraction failed")?;
            (catalog, vec![])
        }
        FailurePolicy::Continue => {
            let report = extractor
                .extract_each(targets)
                .await
                .context("Price extraction failed")?;
            let failed_pages = report
                .failures()
                .map(|(url, e)| FailedPage {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
                .collect();
            (report.catalog(), failed_pages)
        }
    };

    let best_deals = comparator
        .compare(&product_prices)
        .context("Price comparison failed")?;

    Ok(RunReport {
        product_prices,
        failed_pages,
        best_deals,
    })
}
