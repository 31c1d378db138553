//! End-to-end scrape: launch, search, paginate, persist, shut down

use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::Config;
use crate::extract::TableExtractor;
use crate::model::Dataset;
use crate::page::{ChromeTablePage, Settle};
use crate::pagination::{PaginationDriver, StopReason};
use crate::session::BrowserSession;
use crate::sink::{Accumulator, DatasetWriter, snapshot_hook};
use crate::utils::{ScrapeResult, validate_navigation_timeout};

/// Outcome of a completed (possibly partial) scrape
#[derive(Debug)]
pub struct ScrapeReport {
    pub dataset: Dataset,
    pub pages: usize,
    pub stop_reason: StopReason,
    pub output: PathBuf,
}

/// Run one full scrape with its own browser session
///
/// The browser is shut down on every exit path. Errors are returned only when
/// nothing could be read: launch, initial navigation, search submission or the
/// first page snapshot. Anything after that ends in a (possibly partial)
/// dataset written to disk.
pub async fn scrape(config: &Config, cancel: CancellationToken) -> ScrapeResult<ScrapeReport> {
    config.validate()?;
    let extractor = TableExtractor::new(&config.selectors, &config.markers)?;
    let settle = Settle::from_config(&config.timing)?;

    let mut session = BrowserSession::launch(&config.browser).await?;
    let outcome = run_session(&session, config, &extractor, settle, cancel).await;
    session.shutdown().await;
    outcome
}

async fn run_session(
    session: &BrowserSession,
    config: &Config,
    extractor: &TableExtractor,
    settle: Settle,
    cancel: CancellationToken,
) -> ScrapeResult<ScrapeReport> {
    let timeout = validate_navigation_timeout(config.browser.navigation_timeout_ms)?;
    let page = session.open(&config.target_url, timeout).await?;
    let table = ChromeTablePage::new(page, config)?;

    match config.search_term.as_deref() {
        Some(term) => table.submit_search(term).await?,
        None => table.wait_for_results().await?,
    }

    let writer = DatasetWriter::new(&config.output.dir);
    let mut acc = Accumulator::new();
    let driver = PaginationDriver::new(&table, extractor, config.expansion, settle, cancel);

    let stop_reason = driver
        .run(
            &mut acc,
            snapshot_hook(&writer, config.output.intermediate_snapshot),
        )
        .await?;

    let pages = acc.pages();
    let dataset = acc.finalize();
    let output = writer.write_final(&dataset)?;

    Ok(ScrapeReport {
        dataset,
        pages,
        stop_reason,
        output,
    })
}
