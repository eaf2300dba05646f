use url::Url;

use crate::error::ConfigurationError;

pub const DEFAULT_PRICE_SELECTOR: &str = "span.price-item";

/// A page to scrape and, optionally, the CSS selector its prices live under.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTarget {
    pub url: String,
    pub selector: Option<String>,
}

impl PageTarget {
    pub fn new(url: &str, selector: Option<&str>) -> Result<Self, ConfigurationError> {
        Url::parse(url).map_err(|source| ConfigurationError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        Ok(PageTarget {
            url: url.to_string(),
            selector: selector
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }

    pub fn selector_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.selector.as_deref().unwrap_or(default)
    }
}

/// Drops repeated URLs, keeping the first occurrence and its selector.
pub fn dedup_targets(targets: Vec<PageTarget>) -> Vec<PageTarget> {
    let mut kept: Vec<PageTarget> = Vec::with_capacity(targets.len());
    for target in targets {
        if !kept.iter().any(|t| t.url == target.url) {
            kept.push(target);
        }
    }
    kept
}
