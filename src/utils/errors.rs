use thiserror::Error;

use crate::browser::BrowserError;

/// Errors raised while driving the host page or writing results
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Timed out after {timeout_ms}ms waiting for {what}")]
    Timeout { what: String, timeout_ms: u128 },

    #[error("Element not found for selector '{0}'")]
    ElementNotFound(String),

    #[error("Interaction failed on '{selector}': {reason}")]
    Interaction { selector: String, reason: String },

    #[error("JavaScript evaluation failed: {0}")]
    JavaScript(String),

    #[error("Invalid CSS selector '{0}'")]
    Selector(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<BrowserError> for ScrapeError {
    fn from(err: BrowserError) -> Self {
        ScrapeError::Browser(err.to_string())
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
