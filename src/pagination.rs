//! Pagination driver
//!
//! Runs `Extracting -> Advancing -> Extracting ... -> Done`. Termination is
//! decided by the page's "Showing X to Y of Z entries" summary rather than by
//! counting rows, since detail rows and variable group sizes inflate row counts.

use std::sync::LazyLock;

use regex::Regex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::SettleMode;
use crate::expand::{ExpansionController, ExpansionPolicy};
use crate::extract::TableExtractor;
use crate::page::{Settle, TablePage};
use crate::sink::Accumulator;
use crate::utils::{ScrapeResult, wait_until};

static SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Showing\s+([\d,]+)\s+to\s+([\d,]+)\s+of\s+([\d,]+)\s+entries")
        .expect("summary pattern is a valid regex")
});

/// Parsed pagination summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl PageSummary {
    /// Parse "Showing <start> to <end> of <total> entries"
    ///
    /// Thousands separators are accepted. Inconsistent numbers
    /// (`start > end` or `end > total`) count as unparseable.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = SUMMARY.captures(text)?;
        let number = |i: usize| caps[i].replace(',', "").parse::<u64>().ok();
        let summary = Self {
            start: number(1)?,
            end: number(2)?,
            total: number(3)?,
        };
        (summary.start <= summary.end && summary.end <= summary.total).then_some(summary)
    }

    pub fn is_last_page(&self) -> bool {
        self.end == self.total
    }
}

/// Why the driver reached `Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Summary reported `end == total`
    LastPage,
    /// Summary element absent
    SummaryMissing,
    /// Summary text did not match the expected format
    SummaryMalformed,
    /// No usable "next page" control
    NoNextControl,
    /// Clicking "next page" failed
    NavigationFailed,
    /// The page did not change after "next page"
    PageDidNotAdvance,
    /// A snapshot after the first page could not be taken
    ExtractionFailed,
    /// Cancelled between pages
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Extracting,
    Advancing,
    Done(StopReason),
}

pub struct PaginationDriver<'a, P: TablePage + ?Sized> {
    page: &'a P,
    extractor: &'a TableExtractor,
    expansion: ExpansionPolicy,
    settle: Settle,
    cancel: CancellationToken,
}

impl<'a, P: TablePage + ?Sized> PaginationDriver<'a, P> {
    pub fn new(
        page: &'a P,
        extractor: &'a TableExtractor,
        expansion: ExpansionPolicy,
        settle: Settle,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            page,
            extractor,
            expansion,
            settle,
            cancel,
        }
    }

    /// Visit pages until `Done`, appending each page's locations to `acc`
    ///
    /// `on_page` runs after every append with the 1-based page number. Only a
    /// failure to read the very first page is returned as an error; every later
    /// failure stops pagination and keeps what was accumulated.
    pub async fn run<F>(&self, acc: &mut Accumulator, mut on_page: F) -> ScrapeResult<StopReason>
    where
        F: FnMut(usize, &Accumulator),
    {
        let mut state = DriverState::Extracting;
        let mut page_number = 1;
        let mut last_summary = String::new();

        loop {
            state = match state {
                DriverState::Extracting => {
                    if self.cancel.is_cancelled() {
                        info!("Cancelled before page {}", page_number);
                        DriverState::Done(StopReason::Cancelled)
                    } else {
                        match self.extract_page(page_number, acc).await {
                            Ok(()) => {
                                on_page(page_number, acc);
                                self.next_state(&mut last_summary).await
                            }
                            Err(e) if page_number == 1 => return Err(e),
                            Err(e) => {
                                warn!("Failed to read page {}: {}", page_number, e);
                                DriverState::Done(StopReason::ExtractionFailed)
                            }
                        }
                    }
                }
                DriverState::Advancing => match self.page.click_next().await {
                    Ok(false) => DriverState::Done(StopReason::NoNextControl),
                    Err(e) => {
                        warn!("Next-page navigation failed after page {}: {}", page_number, e);
                        DriverState::Done(StopReason::NavigationFailed)
                    }
                    Ok(true) => {
                        if self.settle_after_next(&last_summary).await {
                            page_number += 1;
                            DriverState::Extracting
                        } else {
                            warn!("Page did not advance past '{}'", last_summary);
                            DriverState::Done(StopReason::PageDidNotAdvance)
                        }
                    }
                },
                DriverState::Done(reason) => {
                    info!(
                        "Pagination finished after {} page(s): {:?}",
                        acc.pages(),
                        reason
                    );
                    return Ok(reason);
                }
            };
        }
    }

    async fn extract_page(&self, page_number: usize, acc: &mut Accumulator) -> ScrapeResult<()> {
        if self.expansion.applies_to(page_number) {
            ExpansionController::new(self.page, self.settle)
                .expand_all()
                .await;
        }

        let html = self.page.snapshot().await?;
        let locations = self.extractor.extract(&html);
        let opportunities: usize = locations.iter().map(|l| l.opportunities.len()).sum();
        info!(
            "Page {}: {} locations, {} opportunities",
            page_number,
            locations.len(),
            opportunities
        );

        acc.append(locations);
        Ok(())
    }

    /// Read the summary and decide between `Advancing` and `Done`
    async fn next_state(&self, last_summary: &mut String) -> DriverState {
        let text = match self.page.pagination_summary().await {
            Ok(Some(text)) => text,
            Ok(None) => return DriverState::Done(StopReason::SummaryMissing),
            Err(e) => {
                warn!("Could not read pagination summary: {}", e);
                return DriverState::Done(StopReason::SummaryMissing);
            }
        };

        match PageSummary::parse(&text) {
            None => {
                warn!("Unrecognised pagination summary '{}', treating as end of data", text);
                DriverState::Done(StopReason::SummaryMalformed)
            }
            Some(summary) if summary.is_last_page() => DriverState::Done(StopReason::LastPage),
            Some(summary) => {
                info!("Showing {}-{} of {}", summary.start, summary.end, summary.total);
                *last_summary = text;
                DriverState::Advancing
            }
        }
    }

    /// Wait for the next page to render; `false` if the summary never changed
    ///
    /// In fixed mode the settle delay is only the first check: a page still
    /// showing the old summary afterwards is polled for up to `poll_timeout`.
    async fn settle_after_next(&self, previous: &str) -> bool {
        let page = self.page;
        let changed = move || async move {
            page.pagination_summary()
                .await
                .map(|current| current.as_deref() != Some(previous))
        };

        match self.settle.mode {
            SettleMode::Poll => wait_until(self.settle.poll_timeout, changed).await,
            SettleMode::Fixed => {
                self.settle.fixed_delay().await;
                match changed().await {
                    Ok(false) => wait_until(self.settle.poll_timeout, changed).await,
                    _ => true,
                }
            }
        }
    }
}
