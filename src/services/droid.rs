use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::{error::WebDriverError, prelude::*, ChromiumLikeCapabilities};

use crate::{configuration::BrowserSettings, error::BrowserError};

use super::{Browser, BrowserLauncher};

/// A Chrome session driven over WebDriver.
pub struct Droid {
    pub driver: WebDriver,
    poll_interval: Duration,
}

impl Droid {
    pub async fn new(settings: &BrowserSettings) -> Result<Self, WebDriverError> {
        let mut caps = DesiredCapabilities::chrome();
        if settings.headless {
            caps.set_headless()?;
        }

        // http://chrome:4444/wd/hub
        // http://localhost:9515
        let driver = WebDriver::new(settings.webdriver_url.as_str(), caps).await?;
        if settings.maximize_window {
            driver.maximize_window().await?;
        }

        Ok(Droid {
            driver,
            poll_interval: settings.poll_interval(),
        })
    }
}

#[async_trait]
impl Browser for Droid {
    type Element = WebElement;

    async fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn find_visible(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Vec<WebElement>, BrowserError> {
        let elements = self
            .driver
            .query(By::Css(selector))
            .wait(timeout, self.poll_interval)
            .and_displayed()
            .all_from_selector()
            .await?;

        match elements.is_empty() {
            true => Err(BrowserError::NotVisible {
                selector: selector.to_string(),
                timeout,
            }),
            false => Ok(elements),
        }
    }

    async fn text(&self, element: &WebElement) -> Result<String, BrowserError> {
        Ok(element.text().await?)
    }

    async fn quit(self) -> Result<(), BrowserError> {
        self.driver.quit().await?;
        Ok(())
    }
}

/// Starts a fresh [`Droid`] for every extraction run.
pub struct DroidLauncher {
    settings: BrowserSettings,
}

impl DroidLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        DroidLauncher { settings }
    }
}

#[async_trait]
impl BrowserLauncher for DroidLauncher {
    type Browser = Droid;

    async fn launch(&self) -> Result<Droid, BrowserError> {
        log::info!("Connecting to webdriver at {}", self.settings.webdriver_url);
        Ok(Droid::new(&self.settings).await?)
    }
}
