//! Seam between the extraction engine and the live host page
//!
//! Everything the engine needs from the browser goes through [`TablePage`], so
//! the expansion controller and pagination driver run unchanged against an
//! in-memory page in tests.

mod chrome;

pub use chrome::ChromeTablePage;

use async_trait::async_trait;
use std::time::Duration;

use crate::utils::{ScrapeResult, validate_interaction_timeout};
use crate::{SettleMode, TimingConfig};

#[async_trait]
pub trait TablePage: Send + Sync {
    /// Outer HTML of the results container as currently rendered
    async fn snapshot(&self) -> ScrapeResult<String>;

    /// Text of the pagination summary, `None` when the element is absent
    async fn pagination_summary(&self) -> ScrapeResult<Option<String>>;

    /// Give every expand control a stable index and return how many exist
    async fn tag_expand_controls(&self) -> ScrapeResult<usize>;

    /// Trigger the expand control tagged with `index`
    async fn click_expand(&self, index: usize) -> ScrapeResult<()>;

    /// Trigger "next page"; `Ok(false)` when no usable control exists
    async fn click_next(&self) -> ScrapeResult<bool>;

    /// Number of rendered detail rows
    async fn detail_row_count(&self) -> ScrapeResult<usize>;
}

/// Wait applied after an interaction before the DOM is read again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settle {
    pub mode: SettleMode,
    pub delay: Duration,
    pub poll_timeout: Duration,
}

impl Settle {
    pub fn from_config(timing: &TimingConfig) -> ScrapeResult<Self> {
        Ok(Self {
            mode: timing.settle_mode,
            delay: validate_interaction_timeout(timing.settle_ms)?,
            poll_timeout: validate_interaction_timeout(timing.poll_timeout_ms)?,
        })
    }

    /// No waiting at all
    pub fn immediate() -> Self {
        Self {
            mode: SettleMode::Fixed,
            delay: Duration::ZERO,
            poll_timeout: Duration::ZERO,
        }
    }

    pub async fn fixed_delay(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
