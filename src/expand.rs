//! Expansion controller
//!
//! Detail rows only exist in the DOM after their group's expand control has
//! been triggered. Controls are tagged once per page and then triggered one
//! at a time, strictly in sequence, each followed by a settle wait.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::SettleMode;
use crate::page::{Settle, TablePage};
use crate::utils::wait_until;

/// Which pages get their detail rows expanded before extraction
///
/// `FirstPage` reproduces the reference behaviour: detail content is revealed
/// once and later pages are read as rendered. Whether the host page keeps
/// that state across pagination is unknown, so `EveryPage` re-expands on
/// every page at the cost of one interaction per group.
///
/// The host controls are toggles. On a host that does keep expansion state,
/// `EveryPage` closes the groups it finds open, so their detail fields come
/// back empty; prefer `FirstPage` there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionPolicy {
    #[default]
    FirstPage,
    EveryPage,
    Never,
}

impl ExpansionPolicy {
    /// Whether page `page_number` (1-based) should be expanded
    pub fn applies_to(self, page_number: usize) -> bool {
        match self {
            ExpansionPolicy::FirstPage => page_number == 1,
            ExpansionPolicy::EveryPage => true,
            ExpansionPolicy::Never => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandOutcome {
    Triggered,
    Failed,
}

/// Counts from one page's expansion pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpansionSummary {
    pub controls: usize,
    pub triggered: usize,
    pub failed: usize,
}

pub struct ExpansionController<'a, P: TablePage + ?Sized> {
    page: &'a P,
    settle: Settle,
}

impl<'a, P: TablePage + ?Sized> ExpansionController<'a, P> {
    pub fn new(page: &'a P, settle: Settle) -> Self {
        Self { page, settle }
    }

    /// Trigger the expand control of group `group_index` and let it render
    ///
    /// Failure is logged and reported, never propagated: the group's detail
    /// fields simply stay empty.
    pub async fn expand(&self, group_index: usize) -> ExpandOutcome {
        let before = match self.settle.mode {
            SettleMode::Poll => self.page.detail_row_count().await.ok(),
            SettleMode::Fixed => None,
        };

        if let Err(e) = self.page.click_expand(group_index).await {
            warn!("Failed to expand group {}: {}", group_index, e);
            return ExpandOutcome::Failed;
        }

        match (self.settle.mode, before) {
            (SettleMode::Poll, Some(before)) => {
                let page = self.page;
                let rendered = wait_until(self.settle.poll_timeout, move || async move {
                    page.detail_row_count().await.map(|n| n != before)
                })
                .await;
                if !rendered {
                    debug!("Detail rows unchanged after expanding group {}", group_index);
                }
            }
            _ => self.settle.fixed_delay().await,
        }

        ExpandOutcome::Triggered
    }

    /// Tag every expand control on the page and trigger them in order
    pub async fn expand_all(&self) -> ExpansionSummary {
        let controls = match self.page.tag_expand_controls().await {
            Ok(n) => n,
            Err(e) => {
                warn!("Could not locate expand controls: {}", e);
                return ExpansionSummary::default();
            }
        };

        let mut summary = ExpansionSummary {
            controls,
            ..Default::default()
        };
        for index in 0..controls {
            match self.expand(index).await {
                ExpandOutcome::Triggered => summary.triggered += 1,
                ExpandOutcome::Failed => summary.failed += 1,
            }
        }

        info!(
            "Expanded {}/{} groups ({} failed)",
            summary.triggered, summary.controls, summary.failed
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_pages() {
        assert!(ExpansionPolicy::FirstPage.applies_to(1));
        assert!(!ExpansionPolicy::FirstPage.applies_to(2));
        assert!(ExpansionPolicy::EveryPage.applies_to(7));
        assert!(!ExpansionPolicy::Never.applies_to(1));
    }
}
