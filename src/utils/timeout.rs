//! Timeout validation for configured waits

use std::time::Duration;

use super::errors::{ScrapeError, ScrapeResult};

/// Maximum timeout for navigation and results-container waits (5 minutes)
pub const MAX_NAVIGATION_TIMEOUT_MS: u64 = 300_000;

/// Maximum timeout for settle and poll waits after an interaction (30 seconds)
pub const MAX_INTERACTION_TIMEOUT_MS: u64 = 30_000;

/// Validate timeout for navigation operations (initial load, search submit)
pub fn validate_navigation_timeout(ms: u64) -> ScrapeResult<Duration> {
    if ms == 0 || ms > MAX_NAVIGATION_TIMEOUT_MS {
        return Err(ScrapeError::Config(format!(
            "navigation timeout must be between 1ms and {}ms ({} minutes). Received: {}ms ({:.1} minutes)",
            MAX_NAVIGATION_TIMEOUT_MS,
            MAX_NAVIGATION_TIMEOUT_MS / 60_000,
            ms,
            ms as f64 / 60_000.0
        )));
    }

    Ok(Duration::from_millis(ms))
}

/// Validate timeout for waits following an interaction (expand, next page)
///
/// Zero is allowed: a zero settle interval reads the DOM immediately.
pub fn validate_interaction_timeout(ms: u64) -> ScrapeResult<Duration> {
    if ms > MAX_INTERACTION_TIMEOUT_MS {
        return Err(ScrapeError::Config(format!(
            "interaction timeout cannot exceed {}ms ({} seconds). Received: {}ms ({} seconds)",
            MAX_INTERACTION_TIMEOUT_MS,
            MAX_INTERACTION_TIMEOUT_MS / 1000,
            ms,
            ms / 1000
        )));
    }

    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_bounds() {
        assert_eq!(
            validate_navigation_timeout(30_000).unwrap(),
            Duration::from_secs(30)
        );
        assert!(validate_navigation_timeout(0).is_err());
        assert!(validate_navigation_timeout(MAX_NAVIGATION_TIMEOUT_MS + 1).is_err());
    }

    #[test]
    fn interaction_bounds() {
        assert_eq!(validate_interaction_timeout(0).unwrap(), Duration::ZERO);
        assert!(validate_interaction_timeout(MAX_INTERACTION_TIMEOUT_MS).is_ok());
        assert!(matches!(
            validate_interaction_timeout(MAX_INTERACTION_TIMEOUT_MS + 1),
            Err(ScrapeError::Config(_))
        ));
    }
}
