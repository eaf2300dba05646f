use std::time::Duration;

use thirtyfour::error::WebDriverError;
use thiserror::Error;

/// Failure reported by a [`crate::services::Browser`] implementation.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("webdriver error: {0}")]
    WebDriver(#[from] WebDriverError),

    #[error("no visible element matched \"{selector}\" within {timeout:?}")]
    NotVisible { selector: String, timeout: Duration },
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to start browser session: {0}")]
    Session(#[source] BrowserError),

    #[error("failed to navigate to {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: BrowserError,
    },

    #[error("failed to locate prices on {url} with selector \"{selector}\": {source}")]
    Elements {
        url: String,
        selector: String,
        #[source]
        source: BrowserError,
    },

    #[error("failed to read price text on {url}: {source}")]
    ElementText {
        url: String,
        #[source]
        source: BrowserError,
    },
}

#[derive(Debug, Error, PartialEq)]
#[error("could not parse price \"{raw}\" from {url}")]
pub struct PriceParseError {
    pub url: String,
    pub raw: String,
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error("invalid target url \"{url}\": {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{0} is not a supported environment. Use either `local` or `production`.")]
    UnknownEnvironment(String),

    #[error("invalid selector override \"{0}\", expected URL=SELECTOR")]
    SelectorOverride(String),
}
