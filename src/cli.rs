use clap::Parser;

use crate::{
    configuration::{FailurePolicy, Settings, TargetSettings},
    error::ConfigurationError,
};

#[derive(Debug, Parser)]
#[command(name = "pricehawk")]
#[command(about = "Scrape product prices from shop pages and find the cheapest source")]
pub struct Cli {
    /// Pages to scrape, in order. Replaces the targets from configuration.
    pub urls: Vec<String>,

    /// Price selector for one page, as URL=SELECTOR. Repeatable.
    #[arg(long = "selector", value_name = "URL=SELECTOR")]
    pub selectors: Vec<String>,

    #[arg(long)]
    pub max_products: Option<usize>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Keep scraping the remaining pages when one fails.
    #[arg(long)]
    pub keep_going: bool,

    #[arg(long, env = "WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,
}

impl Cli {
    /// Layers the command line over the loaded configuration.
    pub fn apply(&self, settings: &mut Settings) -> Result<(), ConfigurationError> {
        let overrides = self
            .selectors
            .iter()
            .map(|raw| parse_selector_override(raw))
            .collect::<Result<Vec<_>, _>>()?;

        if !self.urls.is_empty() {
            settings.targets = self
                .urls
                .iter()
                .map(|url| TargetSettings {
                    url: url.clone(),
                    selector: None,
                })
                .collect();
        }

        for (url, selector) in overrides {
            match settings.targets.iter_mut().find(|t| t.url == url) {
                Some(target) => target.selector = Some(selector),
                None => log::warn!("Selector override for {} matches no target", url),
            }
        }

        if let Some(max_products) = self.max_products {
            settings.scrape.max_products = max_products;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            settings.scrape.timeout_secs = timeout_secs;
        }
        if self.keep_going {
            settings.scrape.failure_policy = FailurePolicy::Continue;
        }
        if let Some(ref webdriver_url) = self.webdriver_url {
            settings.browser.webdriver_url = webdriver_url.clone();
        }

        settings.validate()
    }
}

/// Splits `URL=SELECTOR` at the last `=`, so query strings in the URL
/// survive. Selectors that contain `=` go in the configuration file.
fn parse_selector_override(raw: &str) -> Result<(String, String), ConfigurationError> {
    match raw.rsplit_once('=') {
        Some((url, selector)) if !url.is_empty() && !selector.trim().is_empty() => {
            Ok((url.to_string(), selector.trim().to_string()))
        }
        _ => Err(ConfigurationError::SelectorOverride(raw.to_string())),
    }
}
