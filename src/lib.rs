//! SkillBridge opportunity scraper
//!
//! Drives a chromiumoxide browser through the paginated, grouped locations
//! table and rebuilds one record per master + detail row group.

mod browser;
pub mod browser_setup;
pub mod expand;
pub mod extract;
pub mod model;
pub mod page;
pub mod pagination;
pub mod scrape;
mod session;
pub mod sink;
mod utils;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use utils::constants;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_target_url")]
    pub target_url: String,

    /// Keyword submitted through the search form; `None` scrapes the page as loaded
    #[serde(default = "default_search_term")]
    pub search_term: Option<String>,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub selectors: SelectorConfig,

    #[serde(default)]
    pub markers: RowMarkers,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub expansion: ExpansionPolicy,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Browser security and launch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Disable web security features (Same-Origin Policy, etc.)
    /// WARNING: Only enable for trusted content
    #[serde(default = "default_disable_security")]
    pub disable_security: bool,

    /// Window dimensions
    #[serde(default)]
    pub window: WindowConfig,

    /// Bound on the initial page load and the results-container wait
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: u32,

    #[serde(default = "default_window_height")]
    pub height: u32,
}

/// CSS selectors binding the engine to the host page markup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_search_input")]
    pub search_input: String,
    #[serde(default = "default_search_button")]
    pub search_button: String,
    #[serde(default = "default_results_container")]
    pub results_container: String,
    #[serde(default = "default_rows")]
    pub rows: String,
    #[serde(default = "default_summary")]
    pub summary: String,
    #[serde(default = "default_next_page")]
    pub next_page: String,
    #[serde(default = "default_expand_control")]
    pub expand_control: String,
    #[serde(default = "default_detail_entry")]
    pub detail_entry: String,
    #[serde(default = "default_detail_label")]
    pub detail_label: String,
    #[serde(default = "default_detail_value")]
    pub detail_value: String,
}

/// How the engine waits for the page to re-render after an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettleMode {
    /// Sleep for `settle_ms`
    #[default]
    Fixed,
    /// Poll for a visible change, bounded by `poll_timeout_ms`
    Poll,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    #[serde(default)]
    pub settle_mode: SettleMode,

    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the JSON snapshots
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Also write a snapshot after the first page
    #[serde(default = "default_intermediate_snapshot")]
    pub intermediate_snapshot: bool,
}

fn default_target_url() -> String {
    constants::TARGET_URL.to_string()
}
fn default_search_term() -> Option<String> {
    Some(constants::DEFAULT_SEARCH_TERM.to_string())
}

fn default_headless() -> bool {
    true
}

fn default_disable_security() -> bool {
    false
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_navigation_timeout_ms() -> u64 {
    constants::DEFAULT_NAVIGATION_TIMEOUT_MS
}

fn default_search_input() -> String {
    constants::SEARCH_INPUT_SELECTOR.to_string()
}
fn default_search_button() -> String {
    constants::SEARCH_BUTTON_SELECTOR.to_string()
}
fn default_results_container() -> String {
    constants::RESULTS_CONTAINER_SELECTOR.to_string()
}
fn default_rows() -> String {
    constants::ROW_SELECTOR.to_string()
}
fn default_summary() -> String {
    constants::SUMMARY_SELECTOR.to_string()
}
fn default_next_page() -> String {
    constants::NEXT_PAGE_SELECTOR.to_string()
}
fn default_expand_control() -> String {
    constants::EXPAND_CONTROL_SELECTOR.to_string()
}
fn default_detail_entry() -> String {
    constants::DETAIL_ENTRY_SELECTOR.to_string()
}
fn default_detail_label() -> String {
    constants::DETAIL_LABEL_SELECTOR.to_string()
}
fn default_detail_value() -> String {
    constants::DETAIL_VALUE_SELECTOR.to_string()
}

fn default_settle_ms() -> u64 {
    constants::DEFAULT_SETTLE_MS
}

fn default_poll_timeout_ms() -> u64 {
    constants::DEFAULT_POLL_TIMEOUT_MS
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_intermediate_snapshot() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: default_target_url(),
            search_term: default_search_term(),
            browser: BrowserConfig::default(),
            selectors: SelectorConfig::default(),
            markers: RowMarkers::default(),
            timing: TimingConfig::default(),
            expansion: ExpansionPolicy::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            disable_security: default_disable_security(),
            window: WindowConfig::default(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            search_input: default_search_input(),
            search_button: default_search_button(),
            results_container: default_results_container(),
            rows: default_rows(),
            summary: default_summary(),
            next_page: default_next_page(),
            expand_control: default_expand_control(),
            detail_entry: default_detail_entry(),
            detail_label: default_detail_label(),
            detail_value: default_detail_value(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            settle_mode: SettleMode::default(),
            poll_timeout_ms: default_poll_timeout_ms(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            intermediate_snapshot: default_intermediate_snapshot(),
        }
    }
}

impl Config {
    /// Check timeouts and selectors before any browser is launched
    pub fn validate(&self) -> ScrapeResult<()> {
        validate_navigation_timeout(self.browser.navigation_timeout_ms)?;
        validate_interaction_timeout(self.timing.settle_ms)?;
        validate_interaction_timeout(self.timing.poll_timeout_ms)?;

        if !self.target_url.starts_with("http://") && !self.target_url.starts_with("https://") {
            return Err(ScrapeError::Config(format!(
                "target_url must start with http:// or https://, got '{}'",
                self.target_url
            )));
        }

        let s = &self.selectors;
        let named = [
            ("results_container", &s.results_container),
            ("rows", &s.rows),
            ("summary", &s.summary),
            ("next_page", &s.next_page),
            ("expand_control", &s.expand_control),
            ("detail_entry", &s.detail_entry),
            ("detail_label", &s.detail_label),
            ("detail_value", &s.detail_value),
        ];
        for (name, selector) in named {
            if selector.trim().is_empty() {
                return Err(ScrapeError::Config(format!("selector '{name}' cannot be empty")));
            }
        }
        if self.search_term.is_some()
            && (s.search_input.trim().is_empty() || s.search_button.trim().is_empty())
        {
            return Err(ScrapeError::Config(
                "search_input and search_button are required when search_term is set".into(),
            ));
        }

        if self.markers.group_header.is_empty() {
            return Err(ScrapeError::Config(
                "markers.group_header needs at least one class".into(),
            ));
        }

        Ok(())
    }
}

/// Load config from a YAML file, falling back to defaults when it is absent
pub fn load_yaml_config(path: &Path) -> ScrapeResult<Config> {
    if path.exists() {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    } else {
        Ok(Config::default())
    }
}

pub use browser::{BrowserError, BrowserResult};
pub use expand::{ExpandOutcome, ExpansionController, ExpansionPolicy, ExpansionSummary};
pub use extract::{RowKind, RowMarkers, TableExtractor};
pub use model::{Dataset, DetailField, Location, Opportunity};
pub use page::{ChromeTablePage, Settle, TablePage};
pub use pagination::{DriverState, PageSummary, PaginationDriver, StopReason};
pub use scrape::{ScrapeReport, scrape};
pub use session::BrowserSession;
pub use sink::{Accumulator, DatasetWriter, snapshot_hook};
pub use utils::{
    ScrapeError, ScrapeResult, validate_interaction_timeout, validate_navigation_timeout,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str(
            r#"
search_term: null
timing:
  settle_mode: poll
expansion: every_page
selectors:
  rows: "table > tbody > tr"
"#,
        )
        .unwrap();

        assert_eq!(config.search_term, None);
        assert_eq!(config.timing.settle_mode, SettleMode::Poll);
        assert_eq!(config.timing.settle_ms, 500);
        assert_eq!(config.expansion, ExpansionPolicy::EveryPage);
        assert_eq!(config.selectors.rows, "table > tbody > tr");
        assert_eq!(config.selectors.summary, "#location-table_info");
        assert_eq!(config.markers, RowMarkers::default());
        assert!(config.browser.headless);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_yields_default_config() {
        let config = load_yaml_config(Path::new("/nonexistent/skillbridge.yaml")).unwrap();
        assert_eq!(config.target_url, "https://skillbridge.osd.mil/locations.htm");
        assert_eq!(config.search_term.as_deref(), Some("*"));
        assert_eq!(config.expansion, ExpansionPolicy::FirstPage);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = Config::default();
        config.timing.settle_ms = 60_000;
        assert!(matches!(config.validate(), Err(ScrapeError::Config(_))));

        let mut config = Config::default();
        config.selectors.summary = "  ".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.target_url = "ftp://example.com".into();
        assert!(config.validate().is_err());
    }
}
