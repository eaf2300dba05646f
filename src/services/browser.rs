use std::{
    ops::{Deref, DerefMut},
    time::Duration,
};

use async_trait::async_trait;

use crate::error::BrowserError;

/// The slice of a browser-automation driver the extractor relies on.
#[async_trait]
pub trait Browser: Send + Sync + Sized {
    type Element: Send + Sync;

    async fn goto(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Blocks until at least one element matching `selector` is displayed or
    /// `timeout` elapses. Matches come back in document order; an expired
    /// wait is [`BrowserError::NotVisible`].
    async fn find_visible(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Vec<Self::Element>, BrowserError>;

    async fn text(&self, element: &Self::Element) -> Result<String, BrowserError>;

    async fn quit(self) -> Result<(), BrowserError>;
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    type Browser: Browser;

    async fn launch(&self) -> Result<Self::Browser, BrowserError>;
}

/// Owns a browser session for the length of one extraction run.
///
/// Call [`SessionGuard::release`] on every path out of the run. A guard that
/// is dropped instead logs a warning and leaves teardown to the driver's own
/// drop handling.
pub struct SessionGuard<B: Browser> {
    open: OpenSession,
    browser: B,
}

/// Warns when it goes out of scope before the session was released.
struct OpenSession {
    released: bool,
}

impl Drop for OpenSession {
    fn drop(&mut self) {
        if !self.released {
            log::warn!("Browser session dropped without release");
        }
    }
}

impl<B: Browser> SessionGuard<B> {
    pub async fn acquire<L>(launcher: &L) -> Result<Self, BrowserError>
    where
        L: BrowserLauncher<Browser = B>,
    {
        let browser = launcher.launch().await?;
        log::info!("Browser session started");

        Ok(SessionGuard {
            open: OpenSession { released: false },
            browser,
        })
    }

    pub async fn release(self) -> Result<(), BrowserError> {
        let SessionGuard { mut open, browser } = self;
        open.released = true;

        browser.quit().await?;
        log::info!("Browser session closed");
        Ok(())
    }
}

impl<B: Browser> Deref for SessionGuard<B> {
    type Target = B;

    fn deref(&self) -> &B {
        &self.browser
    }
}

impl<B: Browser> DerefMut for SessionGuard<B> {
    fn deref_mut(&mut self) -> &mut B {
        &mut self.browser
    }
}
