//! Scoped browser session for one full scrape
//!
//! A scrape owns exactly one browser from launch to shutdown. The caller must
//! call [`BrowserSession::shutdown`] on every exit path; `Drop` on the inner
//! wrapper only aborts the CDP handler and does not close Chrome.

use chromiumoxide::page::Page;
use std::time::Duration;
use tracing::{info, warn};

use crate::BrowserConfig;
use crate::browser::{BrowserWrapper, launch_browser};
use crate::utils::{ScrapeError, ScrapeResult};

pub struct BrowserSession {
    wrapper: Option<BrowserWrapper>,
}

impl BrowserSession {
    pub async fn launch(config: &BrowserConfig) -> ScrapeResult<Self> {
        let wrapper = launch_browser(config).await?;
        Ok(Self {
            wrapper: Some(wrapper),
        })
    }

    fn wrapper(&self) -> ScrapeResult<&BrowserWrapper> {
        self.wrapper
            .as_ref()
            .ok_or_else(|| ScrapeError::Browser("browser session already shut down".into()))
    }

    /// Open a new tab and load `url`, bounded by `timeout`
    ///
    /// Any failure here is fatal to the scrape: no page has been read yet.
    pub async fn open(&self, url: &str, timeout: Duration) -> ScrapeResult<Page> {
        let wrapper = self.wrapper()?;

        // single-page model: drop tabs left over from launch
        if let Ok(existing_pages) = wrapper.browser().pages().await {
            for page in existing_pages {
                let _ = page.close().await;
            }
        }

        let page = wrapper.new_blank_page().await?;

        tokio::time::timeout(timeout, page.goto(url))
            .await
            .map_err(|_| ScrapeError::Timeout {
                what: format!("navigation to {url}"),
                timeout_ms: timeout.as_millis(),
            })?
            .map_err(|e| ScrapeError::Navigation(format!("{url}: {e}")))?;

        tokio::time::timeout(timeout, page.wait_for_navigation())
            .await
            .map_err(|_| ScrapeError::Timeout {
                what: format!("page load of {url}"),
                timeout_ms: timeout.as_millis(),
            })?
            .map_err(|e| ScrapeError::Navigation(format!("{url}: {e}")))?;

        info!("Navigated to {}", url);
        Ok(page)
    }

    /// Close the browser, wait for the process to exit and remove its profile
    ///
    /// Safe to call more than once.
    pub async fn shutdown(&mut self) {
        if let Some(mut wrapper) = self.wrapper.take() {
            info!("Shutting down browser");

            if let Err(e) = wrapper.browser_mut().close().await {
                warn!("Failed to close browser cleanly: {}", e);
            }
            if let Err(e) = wrapper.browser_mut().wait().await {
                warn!("Failed to wait for browser exit: {}", e);
            }

            wrapper.cleanup_temp_dir();
        }
    }
}
