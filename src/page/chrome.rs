//! [`TablePage`] over a chromiumoxide `Page`

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::element::Element;
use std::time::Duration;
use tracing::{debug, info};

use super::TablePage;
use crate::Config;
use crate::utils::constants::EXPAND_MARKER_ATTR;
use crate::utils::{ScrapeError, ScrapeResult, validate_navigation_timeout, wait_for_element};

pub struct ChromeTablePage {
    page: Page,
    search_input: String,
    search_button: String,
    results_container: String,
    rows: String,
    summary: String,
    next_page: String,
    expand_control: String,
    detail_class: String,
    wait_timeout: Duration,
}

impl ChromeTablePage {
    pub fn new(page: Page, config: &Config) -> ScrapeResult<Self> {
        let s = &config.selectors;
        Ok(Self {
            page,
            search_input: s.search_input.clone(),
            search_button: s.search_button.clone(),
            results_container: s.results_container.clone(),
            rows: s.rows.clone(),
            summary: s.summary.clone(),
            next_page: s.next_page.clone(),
            expand_control: s.expand_control.clone(),
            detail_class: config.markers.detail.clone(),
            wait_timeout: validate_navigation_timeout(config.browser.navigation_timeout_ms)?,
        })
    }

    /// Fill the search box, submit, and wait for the results container
    ///
    /// A timeout here is fatal: the scrape has nothing to read.
    pub async fn submit_search(&self, term: &str) -> ScrapeResult<()> {
        let input = wait_for_element(&self.page, &self.search_input, self.wait_timeout).await?;
        input
            .click()
            .await
            .map_err(|e| interaction_error(&self.search_input, e))?;
        input
            .type_str(term)
            .await
            .map_err(|e| interaction_error(&self.search_input, e))?;

        let button = wait_for_element(&self.page, &self.search_button, self.wait_timeout).await?;
        self.click_element(&button, &self.search_button).await?;
        info!("Submitted search '{}'", term);

        self.wait_for_results().await
    }

    pub async fn wait_for_results(&self) -> ScrapeResult<()> {
        wait_for_element(&self.page, &self.results_container, self.wait_timeout).await?;
        Ok(())
    }

    /// Scroll into view and click at the element's clickable point
    async fn click_element(&self, element: &Element, selector: &str) -> ScrapeResult<()> {
        element
            .scroll_into_view()
            .await
            .map_err(|e| interaction_error(selector, e))?;
        let point = element
            .clickable_point()
            .await
            .map_err(|e| interaction_error(selector, e))?;
        self.page
            .click(point)
            .await
            .map_err(|e| interaction_error(selector, e))?;
        Ok(())
    }

    async fn evaluate_count(&self, script: String) -> ScrapeResult<usize> {
        self.page
            .evaluate_expression(script)
            .await
            .map_err(|e| ScrapeError::JavaScript(e.to_string()))?
            .into_value::<usize>()
            .map_err(|e| ScrapeError::JavaScript(e.to_string()))
    }
}

fn interaction_error(selector: &str, err: impl std::fmt::Display) -> ScrapeError {
    ScrapeError::Interaction {
        selector: selector.to_string(),
        reason: err.to_string(),
    }
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

#[async_trait]
impl TablePage for ChromeTablePage {
    async fn snapshot(&self) -> ScrapeResult<String> {
        let container =
            wait_for_element(&self.page, &self.results_container, self.wait_timeout).await?;
        container
            .outer_html()
            .await
            .map_err(|e| ScrapeError::JavaScript(e.to_string()))?
            .ok_or_else(|| ScrapeError::ElementNotFound(self.results_container.clone()))
    }

    async fn pagination_summary(&self) -> ScrapeResult<Option<String>> {
        let Ok(element) = self.page.find_element(&self.summary).await else {
            return Ok(None);
        };
        element
            .inner_text()
            .await
            .map_err(|e| ScrapeError::JavaScript(e.to_string()))
    }

    async fn tag_expand_controls(&self) -> ScrapeResult<usize> {
        let script = format!(
            "(() => {{ const els = document.querySelectorAll({sel}); \
             els.forEach((el, i) => el.setAttribute({attr}, String(i))); \
             return els.length; }})()",
            sel = js_string(&self.expand_control),
            attr = js_string(EXPAND_MARKER_ATTR),
        );
        let count = self.evaluate_count(script).await?;
        debug!("Tagged {} expand controls", count);
        Ok(count)
    }

    async fn click_expand(&self, index: usize) -> ScrapeResult<()> {
        let selector = format!("[{EXPAND_MARKER_ATTR}=\"{index}\"]");
        let element = self
            .page
            .find_element(&selector)
            .await
            .map_err(|_| ScrapeError::ElementNotFound(selector.clone()))?;
        self.click_element(&element, &selector).await
    }

    async fn click_next(&self) -> ScrapeResult<bool> {
        let Ok(element) = self.page.find_element(&self.next_page).await else {
            return Ok(false);
        };

        let class = element.attribute("class").await.ok().flatten().unwrap_or_default();
        if class.split_whitespace().any(|c| c == "disabled") {
            return Ok(false);
        }

        self.click_element(&element, &self.next_page).await?;
        Ok(true)
    }

    async fn detail_row_count(&self) -> ScrapeResult<usize> {
        let script = format!(
            "Array.from(document.querySelectorAll({rows})).filter(r => r.classList.contains({class})).length",
            rows = js_string(&self.rows),
            class = js_string(&self.detail_class),
        );
        self.evaluate_count(script).await
    }
}
