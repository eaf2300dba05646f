use indexmap::IndexMap;
use serde::Serialize;

use crate::error::ExtractionError;

/// Price texts scraped from one page, in document order.
pub type RawPriceList = Vec<String>;

/// URL -> scraped price texts, in the order the pages were given.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceCatalog {
    pages: IndexMap<String, RawPriceList>,
}

impl PriceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any list already recorded for `url` without moving it.
    pub fn insert(&mut self, url: impl Into<String>, prices: RawPriceList) {
        self.pages.insert(url.into(), prices);
    }

    pub fn get(&self, url: &str) -> Option<&RawPriceList> {
        self.pages.get(url)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawPriceList)> {
        self.pages.iter().map(|(url, prices)| (url.as_str(), prices))
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }
}

impl<U: Into<String>> FromIterator<(U, RawPriceList)> for PriceCatalog {
    fn from_iter<I: IntoIterator<Item = (U, RawPriceList)>>(iter: I) -> Self {
        let mut catalog = PriceCatalog::new();
        for (url, prices) in iter {
            catalog.insert(url, prices);
        }
        catalog
    }
}

/// Outcome of scraping every page independently.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    outcomes: IndexMap<String, Result<RawPriceList, ExtractionError>>,
}

impl ExtractionReport {
    pub fn record(&mut self, url: impl Into<String>, outcome: Result<RawPriceList, ExtractionError>) {
        self.outcomes.insert(url.into(), outcome);
    }

    pub fn get(&self, url: &str) -> Option<&Result<RawPriceList, ExtractionError>> {
        self.outcomes.get(url)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ExtractionError)> {
        self.outcomes
            .iter()
            .filter_map(|(url, outcome)| outcome.as_ref().err().map(|e| (url.as_str(), e)))
    }

    /// Catalog made of the pages that were scraped successfully.
    pub fn catalog(&self) -> PriceCatalog {
        self.outcomes
            .iter()
            .filter_map(|(url, outcome)| {
                outcome
                    .as_ref()
                    .ok()
                    .map(|prices| (url.clone(), prices.clone()))
            })
            .collect()
    }
}

/// A scraped item carrying a caller-supplied product key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedPrice {
    pub key: String,
    pub raw: String,
}

impl KeyedPrice {
    pub fn new(key: impl Into<String>, raw: impl Into<String>) -> Self {
        KeyedPrice {
            key: key.into(),
            raw: raw.into(),
        }
    }
}

/// URL -> keyed items, for matching products across sites by identity
/// instead of by position. Built by library callers that already know each
/// product's key; see [`crate::services::DealComparator::compare_keyed`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyedCatalog {
    pages: IndexMap<String, Vec<KeyedPrice>>,
}

impl KeyedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, items: Vec<KeyedPrice>) {
        self.pages.insert(url.into(), items);
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[KeyedPrice])> {
        self.pages
            .iter()
            .map(|(url, items)| (url.as_str(), items.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thirtyfour::error::WebDriverError;

    use crate::error::BrowserError;

    #[test]
    fn catalog_keeps_insertion_order() {
        let catalog: PriceCatalog = vec![
            ("https://z.example", vec!["$1".to_string()]),
            ("https://a.example", vec![]),
            ("https://m.example", vec!["$2".to_string()]),
        ]
        .into_iter()
        .collect();

        let urls: Vec<&str> = catalog.urls().collect();
        assert_eq!(
            urls,
            vec!["https://z.example", "https://a.example", "https://m.example"]
        );
    }

    #[test]
    fn catalog_serializes_as_plain_object() {
        let mut catalog = PriceCatalog::new();
        catalog.insert("https://a.example", vec!["$10.00".to_string()]);

        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(json, r#"{"https://a.example":["$10.00"]}"#);
    }

    #[test]
    fn report_catalog_skips_failed_pages() {
        let mut report = ExtractionReport::default();
        report.record("https://a.example", Ok(vec!["$3.00".to_string()]));
        report.record(
            "https://b.example",
            Err(ExtractionError::Navigation {
                url: "https://b.example".to_string(),
                source: BrowserError::WebDriver(WebDriverError::RequestFailed(
                    "connection refused".to_string(),
                )),
            }),
        );

        let catalog = report.catalog();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("https://a.example").unwrap(), &vec!["$3.00"]);

        let failures: Vec<&str> = report.failures().map(|(url, _)| url).collect();
        assert_eq!(failures, vec!["https://b.example"]);
    }
}
