//! Polling helpers for JavaScript-rendered content
//!
//! The host table renders asynchronously after every interaction, so reads
//! either poll for an element or poll for an arbitrary condition with
//! exponential backoff, bounded by a timeout.

use std::future::Future;
use std::time::{Duration, Instant};

use chromiumoxide::Page;
use chromiumoxide::element::Element;

use super::errors::{ScrapeError, ScrapeResult};

const INITIAL_POLL_INTERVAL: Duration = Duration::from_millis(100);
const MAX_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Wait for an element to appear in the DOM using exponential backoff polling
///
/// # Polling Strategy
/// - Starts at 100ms intervals
/// - Doubles each retry
/// - Caps at 1 second maximum interval
/// - Total duration limited by timeout parameter
pub async fn wait_for_element(
    page: &Page,
    selector: &str,
    timeout: Duration,
) -> ScrapeResult<Element> {
    let start = Instant::now();
    let mut poll_interval = INITIAL_POLL_INTERVAL;

    loop {
        if let Ok(element) = page.find_element(selector).await {
            return Ok(element);
        }

        if start.elapsed() >= timeout {
            return Err(ScrapeError::Timeout {
                what: format!("element '{selector}'"),
                timeout_ms: timeout.as_millis(),
            });
        }

        tokio::time::sleep(poll_interval).await;
        poll_interval = (poll_interval * 2).min(MAX_POLL_INTERVAL);
    }
}

/// Poll `condition` until it yields `true` or `timeout` elapses
///
/// Returns `true` when the condition held, `false` on timeout. Errors
/// from the condition itself are treated as "not yet" and retried.
pub async fn wait_until<F, Fut>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ScrapeResult<bool>>,
{
    let start = Instant::now();
    let mut poll_interval = INITIAL_POLL_INTERVAL;

    loop {
        if let Ok(true) = condition().await {
            return true;
        }

        if start.elapsed() >= timeout {
            return false;
        }

        let remaining = timeout.saturating_sub(start.elapsed());
        tokio::time::sleep(poll_interval.min(remaining)).await;
        poll_interval = (poll_interval * 2).min(MAX_POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn wait_until_returns_once_condition_holds() {
        let calls = AtomicUsize::new(0);
        let held = wait_until(Duration::from_secs(5), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(n >= 2) }
        })
        .await;

        assert!(held);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn wait_until_gives_up_after_timeout() {
        let held = wait_until(Duration::from_millis(50), || async {
            Err(ScrapeError::JavaScript("not rendered".into()))
        })
        .await;

        assert!(!held);
    }
}
